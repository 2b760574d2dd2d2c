//! `FluidicPosition` and `Direction`.

/// A named stop along the channel, plus the two sentinels used when the
/// controller has no reliable fix on where the fluid front is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum FluidicPosition {
    Home,
    Down,
    A,
    B,
    C,
    Unknown,
    None,
}

impl FluidicPosition {
    pub fn is_sentinel(self) -> bool {
        matches!(self, FluidicPosition::Unknown | FluidicPosition::None)
    }

    /// The three positions that carry a `PositionLimits` entry distinct
    /// from the endpoints (used by mix legality and `SetParams`
    /// monotonicity checks).
    pub fn is_mix_eligible_target(self) -> bool {
        matches!(self, FluidicPosition::A | FluidicPosition::B | FluidicPosition::C)
    }

    /// Index into a `[PositionLimits; 5]` table. Sentinels have none.
    pub fn limits_index(self) -> Option<usize> {
        match self {
            FluidicPosition::Home => Some(0),
            FluidicPosition::Down => Some(1),
            FluidicPosition::A => Some(2),
            FluidicPosition::B => Some(3),
            FluidicPosition::C => Some(4),
            FluidicPosition::Unknown | FluidicPosition::None => None,
        }
    }
}

/// Direction of travel along the channel. `Forward` drives the fluid
/// front further toward `Home` (increasing piezo voltage); `Reverse`
/// retreats it toward `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn invert(self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_not_mix_eligible() {
        assert!(!FluidicPosition::Unknown.is_mix_eligible_target());
        assert!(!FluidicPosition::None.is_mix_eligible_target());
        assert!(FluidicPosition::A.is_mix_eligible_target());
    }

    #[test]
    fn direction_inverts() {
        assert_eq!(Direction::Forward.invert(), Direction::Reverse);
        assert_eq!(Direction::Reverse.invert(), Direction::Forward);
    }
}
