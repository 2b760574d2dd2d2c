//! Command gate: pure parameter/state validation, no side effects.
//! `main.rs` logs the rejection reason before replying; this module
//! only classifies.

use super::constants::*;
use super::params::{FluidicParams, MixType, OvershootMode};
use super::position::FluidicPosition;
use super::sequencer::LeafState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move { target: FluidicPosition, ramp: f32, timeout_ms: u32, overshoot_mode: OvershootMode, overshoot_proportion: f32 },
    LiftBladders { ramp: f32, timeout_ms: u32 },
    Mix { target: FluidicPosition, frequency_hz: f32, timeout_ms: u32, cycles: u32, mix_type: MixType, open_loop_comp: f32, downstroke_proportion: f32 },
    WaitForFluidAt { target: FluidicPosition, timeout_ms: u32 },
    Stop,
    ClearError,
    SetParams(FluidicParams),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateResult {
    Accepted,
    NotReady,
    BadArgs(&'static str),
    InvalidMove,
}

/// The move legality matrix: which targets are reachable from each
/// current position.
pub fn is_legal_move(current: FluidicPosition, target: FluidicPosition) -> bool {
    use FluidicPosition::*;
    match current {
        Home => matches!(target, Home | Down),
        Down | A | B | C => !target.is_sentinel(),
        Unknown | None => matches!(target, Home),
    }
}

fn can_accept_command(leaf: LeafState) -> bool {
    matches!(leaf, LeafState::Idle | LeafState::MonitorFluidBreach)
}

/// Validates a `Command` against the current controller position/state.
/// Never mutates anything; `main.rs`/`Controller::dispatch` is
/// responsible for acting on the result.
pub fn validate(
    cmd: &Command,
    current_pos: FluidicPosition,
    leaf: LeafState,
    params: &FluidicParams,
) -> GateResult {
    match cmd {
        Command::Move { target, ramp, .. } if *target == FluidicPosition::Home => {
            // "Move(Home) is always accepted regardless of state (it is
            // the safe recovery action)" — still must be a sane ramp,
            // but the internal override in dispatch replaces it anyway.
            let _ = ramp;
            GateResult::Accepted
        }
        Command::Move { target, ramp, overshoot_mode, overshoot_proportion, .. } => {
            if !can_accept_command(leaf) {
                return GateResult::NotReady;
            }
            if !(*ramp > 0.0 && *ramp <= PIEZO_RAMP_MAX) {
                return GateResult::BadArgs("ramp out of range");
            }
            if *overshoot_proportion > 1.0 {
                return GateResult::BadArgs("overshoot proportion out of range");
            }
            let _ = overshoot_mode;
            if !is_legal_move(current_pos, *target) {
                return GateResult::InvalidMove;
            }
            GateResult::Accepted
        }
        Command::LiftBladders { ramp, .. } => {
            if !can_accept_command(leaf) {
                return GateResult::NotReady;
            }
            if !(*ramp > 0.0 && *ramp <= PIEZO_RAMP_MAX) {
                return GateResult::BadArgs("ramp out of range");
            }
            GateResult::Accepted
        }
        Command::Mix { target, frequency_hz, timeout_ms, mix_type, downstroke_proportion, .. } => {
            if !can_accept_command(leaf) {
                return GateResult::NotReady;
            }
            if target.is_sentinel() || *target == FluidicPosition::Home {
                return GateResult::InvalidMove;
            }
            if !is_mix_target_lower(current_pos, *target, params) {
                return GateResult::InvalidMove;
            }
            if *frequency_hz == 0.0 {
                return GateResult::BadArgs("zero mix frequency");
            }
            let span = (params.volts(current_pos) - params.volts(*target)).abs();
            if span * frequency_hz > PIEZO_RAMP_MAX {
                return GateResult::BadArgs("implied mix ramp exceeds piezo maximum");
            }
            if !(*timeout_ms > 0 && *timeout_ms <= params.mix_timeout_max_ms) {
                return GateResult::BadArgs("mix timeout out of range");
            }
            if *mix_type != MixType::DualPointClosedLoop && *downstroke_proportion <= 0.0 {
                return GateResult::BadArgs("downstroke proportion must be positive");
            }
            GateResult::Accepted
        }
        Command::WaitForFluidAt { target, .. } => {
            if !can_accept_command(leaf) {
                return GateResult::NotReady;
            }
            if target.is_sentinel() {
                return GateResult::InvalidMove;
            }
            GateResult::Accepted
        }
        Command::Stop => GateResult::Accepted,
        Command::ClearError => GateResult::Accepted,
        Command::SetParams(new_params) => {
            if !new_params.validate_monotone() {
                return GateResult::BadArgs("V(A) < V(B) < V(C) violated");
            }
            GateResult::Accepted
        }
    }
}

/// "a mix always oscillates between a higher rest point and a lower
/// target": the target's calibrated voltage must be strictly lower than
/// the current position's.
fn is_mix_target_lower(current_pos: FluidicPosition, target: FluidicPosition, params: &FluidicParams) -> bool {
    if current_pos.is_sentinel() {
        return false;
    }
    params.volts(target) < params.volts(current_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_params;

    #[test]
    fn move_a_from_unknown_is_invalid() {
        assert!(!is_legal_move(FluidicPosition::Unknown, FluidicPosition::A));
    }

    #[test]
    fn move_c_from_home_is_invalid_but_down_is_legal() {
        assert!(!is_legal_move(FluidicPosition::Home, FluidicPosition::C));
        assert!(is_legal_move(FluidicPosition::Home, FluidicPosition::Down));
    }

    #[test]
    fn move_home_always_accepted_even_from_err_leaf() {
        let params = default_params(1);
        let cmd = Command::Move {
            target: FluidicPosition::Home,
            ramp: 2.5,
            timeout_ms: 1000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        };
        assert_eq!(
            validate(&cmd, FluidicPosition::Unknown, LeafState::Err, &params),
            GateResult::Accepted
        );
    }

    #[test]
    fn mix_home_rejected() {
        let params = default_params(1);
        let cmd = Command::Mix {
            target: FluidicPosition::Home,
            frequency_hz: 1.0,
            timeout_ms: 1000,
            cycles: 1,
            mix_type: MixType::DualPointClosedLoop,
            open_loop_comp: 0.0,
            downstroke_proportion: 0.5,
        };
        assert_eq!(validate(&cmd, FluidicPosition::B, LeafState::Idle, &params), GateResult::InvalidMove);
    }

    #[test]
    fn mix_target_not_lower_rejected() {
        let params = default_params(1);
        let cmd = Command::Mix {
            target: FluidicPosition::C,
            frequency_hz: 1.0,
            timeout_ms: 1000,
            cycles: 1,
            mix_type: MixType::DualPointClosedLoop,
            open_loop_comp: 0.0,
            downstroke_proportion: 0.5,
        };
        // A and C have equal default voltage (both 100.0) until calibrated, so
        // neither is strictly lower -- not a legal mix pair.
        assert_eq!(validate(&cmd, FluidicPosition::A, LeafState::Idle, &params), GateResult::InvalidMove);
    }

    #[test]
    fn mix_ramp_over_limit_rejected() {
        let mut params = default_params(1);
        params.limits_mut(FluidicPosition::C).unwrap().target_volts = 300.0;
        let cmd = Command::Mix {
            target: FluidicPosition::A,
            frequency_hz: 10.0,
            timeout_ms: 1000,
            cycles: 1,
            mix_type: MixType::DualPointClosedLoop,
            open_loop_comp: 0.0,
            downstroke_proportion: 0.5,
        };
        assert_eq!(validate(&cmd, FluidicPosition::C, LeafState::Idle, &params), GateResult::BadArgs("implied mix ramp exceeds piezo maximum"));
    }

    #[test]
    fn move_ramp_over_limit_rejected() {
        let params = default_params(1);
        let cmd = Command::Move {
            target: FluidicPosition::A,
            ramp: PIEZO_RAMP_MAX + 1.0,
            timeout_ms: 1000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        };
        assert_eq!(validate(&cmd, FluidicPosition::Down, LeafState::Idle, &params), GateResult::BadArgs("ramp out of range"));
    }

    #[test]
    fn not_ready_outside_idle_or_breach_monitor() {
        let params = default_params(1);
        let cmd = Command::Move {
            target: FluidicPosition::A,
            ramp: 2.5,
            timeout_ms: 1000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        };
        assert_eq!(validate(&cmd, FluidicPosition::Down, LeafState::MoveContact, &params), GateResult::NotReady);
    }
}
