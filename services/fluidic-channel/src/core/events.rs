//! Events published by the controller onto the bus.

use super::error::{CriticalError, FccError, MoveLocalError};
use super::position::FluidicPosition;
use num_traits::{FromPrimitive, ToPrimitive};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FccEvent {
    MoveComplete { channel: u8, rest_position: FluidicPosition, elapsed_ms: u32, piezo_voltage: f32 },
    MoveFail { channel: u8, target_position: FluidicPosition },
    CommandFailed { error: FccError },
    MixComplete { channel: u8, rest_position: FluidicPosition },
    MixStageComplete { channel: u8 },
    BreachDetected { channel: u8 },
    FluidError { channel: u8, error_code: u32 },
    StartBladderDetect { channel: u8 },
    StopBladderDetect { channel: u8 },
}

fn encode_error(error: FccError) -> (usize, usize) {
    match error {
        FccError::MoveLocal(e) => (0, e.to_usize().unwrap()),
        FccError::Critical(e) => (1, e.to_usize().unwrap()),
    }
}

fn decode_error(category: usize, code: usize) -> Option<FccError> {
    match category {
        0 => MoveLocalError::from_usize(code).map(FccError::MoveLocal),
        1 => CriticalError::from_usize(code).map(FccError::Critical),
        _ => None,
    }
}

impl FccEvent {
    /// `FccEventKind` discriminant, for `api::FccEventKind::from_usize`.
    pub fn kind(&self) -> usize {
        match self {
            FccEvent::MoveComplete { .. } => 0,
            FccEvent::MoveFail { .. } => 1,
            FccEvent::CommandFailed { .. } => 2,
            FccEvent::MixComplete { .. } => 3,
            FccEvent::MixStageComplete { .. } => 4,
            FccEvent::BreachDetected { .. } => 5,
            FccEvent::FluidError { .. } => 6,
            FccEvent::StartBladderDetect { .. } => 7,
            FccEvent::StopBladderDetect { .. } => 8,
        }
    }

    /// Packs this event into the four scalar args a hooked listener
    /// receives on its registered opcode: `(kind, channel, arg3, arg4)`,
    /// mirroring `piezo_api::PiezoEvent::decode`'s layout. `channel` is
    /// supplied by the caller rather than read from `self` since
    /// `CommandFailed` carries none of its own -- the publishing
    /// controller always knows which channel it is. `MoveComplete`'s
    /// `piezo_voltage` is dropped from the wire form; a listener that
    /// needs it polls `GetStatus`.
    pub fn encode(&self, channel: u8) -> (usize, usize, usize, usize) {
        let kind = self.kind();
        let channel = channel as usize;
        let (arg3, arg4) = match *self {
            FccEvent::MoveComplete { rest_position, elapsed_ms, .. } => {
                (rest_position.to_usize().unwrap(), elapsed_ms as usize)
            }
            FccEvent::MoveFail { target_position, .. } => (target_position.to_usize().unwrap(), 0),
            FccEvent::CommandFailed { error } => encode_error(error),
            FccEvent::MixComplete { rest_position, .. } => (rest_position.to_usize().unwrap(), 0),
            FccEvent::MixStageComplete { .. } => (0, 0),
            FccEvent::BreachDetected { .. } => (0, 0),
            FccEvent::FluidError { error_code, .. } => (error_code as usize, 0),
            FccEvent::StartBladderDetect { .. } => (0, 0),
            FccEvent::StopBladderDetect { .. } => (0, 0),
        };
        (kind, channel, arg3, arg4)
    }

    /// Inverse of `encode`; returns the channel the event was published
    /// for alongside the decoded event.
    pub fn decode(kind: usize, channel: usize, arg3: usize, arg4: usize) -> Option<(u8, FccEvent)> {
        let channel = channel as u8;
        let ev = match kind {
            0 => FccEvent::MoveComplete {
                channel,
                rest_position: FluidicPosition::from_usize(arg3)?,
                elapsed_ms: arg4 as u32,
                piezo_voltage: 0.0,
            },
            1 => FccEvent::MoveFail { channel, target_position: FluidicPosition::from_usize(arg3)? },
            2 => FccEvent::CommandFailed { error: decode_error(arg3, arg4)? },
            3 => FccEvent::MixComplete { channel, rest_position: FluidicPosition::from_usize(arg3)? },
            4 => FccEvent::MixStageComplete { channel },
            5 => FccEvent::BreachDetected { channel },
            6 => FccEvent::FluidError { channel, error_code: arg3 as u32 },
            7 => FccEvent::StartBladderDetect { channel },
            8 => FccEvent::StopBladderDetect { channel },
            _ => return None,
        };
        Some((channel, ev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_complete_round_trips() {
        let ev = FccEvent::MoveComplete {
            channel: 2,
            rest_position: FluidicPosition::B,
            elapsed_ms: 450,
            piezo_voltage: 0.0,
        };
        let (kind, channel, arg3, arg4) = ev.encode(2);
        assert_eq!(FccEvent::decode(kind, channel, arg3, arg4), Some((2, ev)));
    }

    #[test]
    fn command_failed_round_trips_both_categories() {
        let ev = FccEvent::CommandFailed { error: FccError::Critical(CriticalError::FluidFrontBreach) };
        let (kind, channel, arg3, arg4) = ev.encode(3);
        assert_eq!(FccEvent::decode(kind, channel, arg3, arg4), Some((3, ev)));

        let ev = FccEvent::CommandFailed { error: FccError::MoveLocal(MoveLocalError::MixTimeout) };
        let (kind, channel, arg3, arg4) = ev.encode(1);
        assert_eq!(FccEvent::decode(kind, channel, arg3, arg4), Some((1, ev)));
    }
}
