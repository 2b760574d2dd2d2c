//! Piezo move primitive and overshoot compensation.

use super::constants::PIEZO_MIN_VOLTAGE;
use super::params::{FluidicParams, OvershootMode};
use super::position::{Direction, FluidicPosition};

/// The piezo target voltage for a move toward `position`, including
/// hysteresis in the direction of travel.
pub fn move_target_volts(params: &FluidicParams, position: FluidicPosition, direction: Direction) -> f32 {
    let limits = match params.limits(position) {
        Some(l) => l,
        None => return params.volts(position),
    };
    match direction {
        Direction::Forward => limits.target_volts + limits.hysteresis,
        Direction::Reverse => (limits.target_volts - limits.hysteresis).max(PIEZO_MIN_VOLTAGE),
    }
}

/// The position one calibration step below `position` along A-B-C-Down,
/// used by the `PiezoVolts` overshoot formula (`V(target) - V(target-1)`).
fn prior_position(position: FluidicPosition) -> Option<FluidicPosition> {
    match position {
        FluidicPosition::A => Some(FluidicPosition::Down),
        FluidicPosition::B => Some(FluidicPosition::A),
        FluidicPosition::C => Some(FluidicPosition::B),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OvershootOutcome {
    /// `None` policy, or any Reverse-direction stop: publish success now.
    PublishSuccess,
    /// `PiezoVolts`: issue a secondary corrective move at max ramp with
    /// completion suppressed; the new (lower) voltage becomes the
    /// updated `V(target)`.
    SecondaryMove { target_volts: f32 },
    /// `BreakRemake`: flip direction and re-enter `MoveContact`. A
    /// secondary forward "remake" swing after the break is not modeled:
    /// the active path simply treats the reverse stop as the move
    /// completing.
    ReenterReverse,
}

/// Decide what happens after the piezo reports stopped at `target`,
/// having moved in `direction`. `mode`/`proportion` are the overshoot
/// policy carried by the `Move` command that initiated this move — a
/// per-move choice, not a persistent channel default.
pub fn apply_overshoot(
    params: &FluidicParams,
    target: FluidicPosition,
    direction: Direction,
    mode: OvershootMode,
    proportion: f32,
) -> OvershootOutcome {
    if direction == Direction::Reverse {
        return OvershootOutcome::PublishSuccess;
    }
    match mode {
        OvershootMode::None => OvershootOutcome::PublishSuccess,
        OvershootMode::PiezoVolts => {
            let v_target = params.volts(target);
            let v_prior = prior_position(target).map(|p| params.volts(p)).unwrap_or(0.0);
            let comp_v = (v_target - v_prior) * proportion;
            OvershootOutcome::SecondaryMove { target_volts: v_target - comp_v }
        }
        OvershootMode::BreakRemake => OvershootOutcome::ReenterReverse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_params;

    #[test]
    fn forward_adds_hysteresis_reverse_subtracts() {
        let p = default_params(1);
        let fwd = move_target_volts(&p, FluidicPosition::B, Direction::Forward);
        let rev = move_target_volts(&p, FluidicPosition::B, Direction::Reverse);
        let base = p.volts(FluidicPosition::B);
        let hyst = p.limits(FluidicPosition::B).unwrap().hysteresis;
        assert_eq!(fwd, base + hyst);
        assert_eq!(rev, base - hyst);
    }

    #[test]
    fn reverse_direction_always_publishes_success() {
        let p = default_params(1);
        assert_eq!(
            apply_overshoot(&p, FluidicPosition::B, Direction::Reverse, OvershootMode::PiezoVolts, 0.5),
            OvershootOutcome::PublishSuccess
        );
    }

    #[test]
    fn none_mode_publishes_success() {
        let p = default_params(1);
        assert_eq!(
            apply_overshoot(&p, FluidicPosition::B, Direction::Forward, OvershootMode::None, 0.0),
            OvershootOutcome::PublishSuccess
        );
    }

    #[test]
    fn piezo_volts_mode_computes_secondary_move() {
        let mut p = default_params(1);
        p.limits_mut(FluidicPosition::A).unwrap().target_volts = 50.0; // "V(target-1)" for B
        p.limits_mut(FluidicPosition::B).unwrap().target_volts = 100.0;
        let outcome = apply_overshoot(&p, FluidicPosition::B, Direction::Forward, OvershootMode::PiezoVolts, 0.5);
        assert_eq!(outcome, OvershootOutcome::SecondaryMove { target_volts: 100.0 - (100.0 - 50.0) * 0.5 });
    }

    #[test]
    fn break_remake_reenters_reverse() {
        let p = default_params(1);
        assert_eq!(
            apply_overshoot(&p, FluidicPosition::B, Direction::Forward, OvershootMode::BreakRemake, 0.0),
            OvershootOutcome::ReenterReverse
        );
    }
}
