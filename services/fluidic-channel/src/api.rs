//! Wire API for the fluidic channel controller service. `core::` stays
//! IPC-agnostic; these are the rkyv-archivable mirrors of its domain
//! types that actually cross a process boundary, plus the dispatch
//! opcodes `main.rs` matches on.

pub const SERVER_NAME_FCC: &str = "_Fluidic channel controller_";

#[derive(Debug, Copy, Clone, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub(crate) enum Opcode {
    /// `Buffer::lend_mut(MoveRequest)` -> write-back `GateResult` byte.
    Move,
    /// arg1=channel arg2=ramp(bits) arg3=timeout_ms -> blocking scalar,
    /// returns `GateResult` as `Scalar1`.
    LiftBladders,
    /// `Buffer::lend_mut(MixRequest)` -> write-back `GateResult` byte.
    Mix,
    /// `Buffer::lend_mut(WaitForFluidAtRequest)` -> write-back `GateResult`.
    WaitForFluidAt,
    /// arg1=channel -> blocking scalar, returns `GateResult`.
    Stop,
    /// arg1=channel -> blocking scalar, returns `GateResult`.
    ClearError,
    /// `Buffer::lend(SetParamsRequest)`.
    SetParams,
    /// `Buffer::lend_mut(GetStatusRequest)` -> buffer is replaced in
    /// place with a packed `StatusWire`.
    GetStatus,
    /// `Buffer::lend(EventHook)`: subscribe to `FccEvent`s for `channel`.
    HookEvents,
    /// internal: pump thread -> main loop, one per `FLUIDIC_TIMER_COUNT_MS`.
    Tick,
    /// arg1=channel arg2..4=piezo_api::PiezoEvent payload.
    PiezoEvent,
    /// Forwarded from the echem driver's shared event hook: a
    /// `Buffer::lend(FluidStatusChangedWire)` memory message for a routine
    /// reading update, or (per `echem_api`'s "`FluidStatusChanged`/
    /// `EchemError`" hook contract) a bare scalar with arg1=channel when
    /// the driver can't produce a reading for that channel.
    EchemEvent,
    /// arg1..2=echem_api::BladderEvent payload.
    EchemBladderEvent,
    /// arg1=channel: the channel's door opened, home silently.
    DoorOpened,
    /// no args: stop every channel immediately.
    GlobalHalt,
    /// arg1=channel: external cross-channel mix barrier has cleared for
    /// this channel, advance out of `MixWaitContinue`. Sent by whatever
    /// orchestrates multi-channel mixes in lock-step; not wrapped by a
    /// convenience method on `FluidicChannel` any more than `DoorOpened`
    /// or `GlobalHalt` are.
    MixContinue,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct MoveRequest {
    pub channel: u8,
    pub target: u8,
    pub ramp: f32,
    pub timeout_ms: u32,
    pub overshoot_mode: u8,
    pub overshoot_proportion: f32,
    pub result: u8,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct MixRequest {
    pub channel: u8,
    pub target: u8,
    pub frequency_hz: f32,
    pub timeout_ms: u32,
    pub cycles: u32,
    pub mix_type: u8,
    pub open_loop_comp: f32,
    pub downstroke_proportion: f32,
    pub result: u8,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct WaitForFluidAtRequest {
    pub channel: u8,
    pub target: u8,
    pub timeout_ms: u32,
    pub result: u8,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct SetParamsRequest {
    pub channel: u8,
    pub positions: [(f32, f32, u8, u8); 5],
    pub move_timeout_ms: u32,
    pub mix_frequency_hz: f32,
    pub mix_timeout_ms: u32,
    pub mix_target_cycles: u32,
    pub ramp_speed: f32,
    pub mix_rest_position: u8,
    pub hysteresis_increase: f32,
    pub hysteresis_decrease: f32,
    pub overshoot_mode: u8,
    pub overshoot_proportion: f32,
    pub mix_type: u8,
    pub open_loop_compensation_factor: f32,
    pub mix_downstroke_proportion: f32,
    pub monitor_breach_after_move: bool,
    pub accepted: bool,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct GetStatusRequest {
    pub channel: u8,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct StatusWire {
    pub leaf: u8,
    pub last_known_pos: u8,
    pub last_fluid_front: u8,
    pub last_piezo_voltage: f32,
    pub direction_forward: bool,
    pub mix_stages_completed: u32,
    pub mix_complete: bool,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct EventHook {
    pub channel: u8,
    pub id: u32,
    pub cid: u32,
}

#[derive(Debug, Copy, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub(crate) struct FluidStatusChangedWire {
    pub per_channel_positions: [u8; 4],
}

pub(crate) fn position_to_wire(p: crate::core::FluidicPosition) -> u8 {
    use num_traits::ToPrimitive;
    p.to_u8().unwrap_or(crate::core::FluidicPosition::Unknown.to_u8().unwrap())
}

pub(crate) fn position_from_wire(v: u8) -> crate::core::FluidicPosition {
    use num_traits::FromPrimitive;
    crate::core::FluidicPosition::from_u8(v).unwrap_or(crate::core::FluidicPosition::Unknown)
}

pub(crate) fn gate_result_to_wire(g: crate::core::GateResult) -> u8 {
    match g {
        crate::core::GateResult::Accepted => 0,
        crate::core::GateResult::NotReady => 1,
        crate::core::GateResult::BadArgs(_) => 2,
        crate::core::GateResult::InvalidMove => 3,
    }
}

pub(crate) fn gate_result_from_wire(v: u8) -> crate::core::GateResult {
    match v {
        0 => crate::core::GateResult::Accepted,
        1 => crate::core::GateResult::NotReady,
        3 => crate::core::GateResult::InvalidMove,
        _ => crate::core::GateResult::BadArgs("rejected by server"),
    }
}

pub(crate) fn overshoot_mode_to_wire(m: crate::core::params::OvershootMode) -> u8 {
    use crate::core::params::OvershootMode::*;
    match m {
        None => 0,
        PiezoVolts => 1,
        BreakRemake => 2,
    }
}

pub(crate) fn overshoot_mode_from_wire(v: u8) -> crate::core::params::OvershootMode {
    use crate::core::params::OvershootMode::*;
    match v {
        1 => PiezoVolts,
        2 => BreakRemake,
        _ => None,
    }
}

pub(crate) fn mix_type_to_wire(m: crate::core::params::MixType) -> u8 {
    use crate::core::params::MixType::*;
    match m {
        DualPointClosedLoop => 0,
        SinglePointClosedLoop => 1,
        OpenLoop => 2,
    }
}

pub(crate) fn mix_type_from_wire(v: u8) -> crate::core::params::MixType {
    use crate::core::params::MixType::*;
    match v {
        1 => SinglePointClosedLoop,
        2 => OpenLoop,
        _ => DualPointClosedLoop,
    }
}

/// Mirrors `core::events::FccEvent`, forwarded verbatim to subscribers.
#[derive(Debug, Copy, Clone, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum FccEventKind {
    MoveComplete,
    MoveFail,
    CommandFailed,
    MixComplete,
    MixStageComplete,
    BreachDetected,
    FluidError,
    StartBladderDetect,
    StopBladderDetect,
}
