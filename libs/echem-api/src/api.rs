#[derive(Debug, Copy, Clone, PartialEq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub(crate) enum Opcode {
    /// arg1=channel arg2=min_contact
    SetModeFillDetect,
    /// arg1=channel
    Disable,
    /// arg1=channel -> blocking, returns Scalar1(FluidPosition as usize)
    GetFluidPosition,
    /// arg1=channel arg2=event_opcode arg3=cid
    HookEvents,
    /// arg1=channel arg2=event_opcode arg3=cid, registers for the
    /// shared bladder up/down broadcast (all four channels, filtered
    /// by the caller)
    HookBladderEvents,
}

/// Fluid-front reading. Totally ordered: `Invalid < NoStrip < NoFluid <
/// Fluid < PositionA < PositionB < PositionC`, matching the monotone
/// geometry of the strip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, num_derive::FromPrimitive, num_derive::ToPrimitive)]
#[repr(usize)]
pub enum FluidPosition {
    Invalid = 0,
    NoStrip,
    NoFluid,
    Fluid,
    PositionA,
    PositionB,
    PositionC,
}

impl Default for FluidPosition {
    fn default() -> Self { FluidPosition::Invalid }
}

/// Which physical bladder an up/down event refers to. The echem driver
/// broadcasts these to all four channels; each FCC filters by its own
/// channel identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum BladderChannel {
    A1,
    B2,
    A3,
    B4,
}

impl BladderChannel {
    /// Maps a 1-indexed strip channel onto the bladder identity the
    /// hardware actually reports: two bladders share each A/B sense
    /// line, surfaced as the `Echem{A1,B2,A3,B4}Bladder{Up,Down}` event
    /// names.
    pub fn for_channel(channel: u8) -> Option<BladderChannel> {
        match channel {
            1 => Some(BladderChannel::A1),
            2 => Some(BladderChannel::B2),
            3 => Some(BladderChannel::A3),
            4 => Some(BladderChannel::B4),
            _ => None,
        }
    }
}
