//! Error taxonomy. Ignorable conditions are not represented
//! here at all — they are handled by early-returning `Ok(())`/dropping
//! the event, the way `services/com`'s dispatch loop silently ignores
//! unrecognised or off-channel events.

use ::core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum MoveLocalError {
    InvalidMove,
    NoStrip,
    CommandTimeout,
    MoveTimeout,
    MixTimeout,
    UnexpectedPiezoMsg,
    UnknownEchemMsg,
    BadArgs,
    FluidSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum CriticalError {
    EchemBusy,
    FluidFrontBreach,
    PiezoUnknown,
    ErrorCountExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FccError {
    MoveLocal(MoveLocalError),
    Critical(CriticalError),
}

impl FccError {
    pub fn is_critical(self) -> bool {
        matches!(self, FccError::Critical(_))
    }
}

impl fmt::Display for MoveLocalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoveLocalError::InvalidMove => "invalid move",
            MoveLocalError::NoStrip => "no strip detected",
            MoveLocalError::CommandTimeout => "command timed out waiting for a strip",
            MoveLocalError::MoveTimeout => "move timed out",
            MoveLocalError::MixTimeout => "mix timed out",
            MoveLocalError::UnexpectedPiezoMsg => "unexpected piezo message",
            MoveLocalError::UnknownEchemMsg => "unknown echem message",
            MoveLocalError::BadArgs => "bad command arguments",
            MoveLocalError::FluidSpeed => "implied ramp speed exceeds piezo maximum",
        };
        f.write_str(s)
    }
}

impl fmt::Display for CriticalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CriticalError::EchemBusy => "electrochemistry driver busy",
            CriticalError::FluidFrontBreach => "fluid front breached a held contact",
            CriticalError::PiezoUnknown => "piezo driver reported an unknown condition",
            CriticalError::ErrorCountExceeded => "too many consecutive errors",
        };
        f.write_str(s)
    }
}

impl fmt::Display for FccError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FccError::MoveLocal(e) => write!(f, "{}", e),
            FccError::Critical(e) => write!(f, "{}", e),
        }
    }
}
