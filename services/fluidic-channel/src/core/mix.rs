//! Mix engine: stroke voltage/ramp computation and
//! hysteresis adaptation for the three mix types. Pure helpers; the
//! sequencer owns the stage counter and rest-position bookkeeping.

use super::constants::{HYST_MAX, HYST_MIN};
use super::params::FluidicParams;
use super::position::{Direction, FluidicPosition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixStroke {
    pub start_volts: f32,
    pub end_volts: f32,
    pub ramp: f32,
}

/// `ramp = |start - end| * 2 * mixFrequency` (factor of 2: one cycle is
/// two strokes).
fn ramp_for(start_volts: f32, end_volts: f32, mix_frequency_hz: f32) -> f32 {
    (start_volts - end_volts).abs() * 2.0 * mix_frequency_hz
}

/// Dual-point closed loop: stroke from `current` to `other`, bounded by
/// echem detection at `other`. End voltage includes hysteresis in the
/// direction of travel.
pub fn closed_loop_stroke(
    params: &FluidicParams,
    current: FluidicPosition,
    other: FluidicPosition,
    direction: Direction,
) -> MixStroke {
    let start_volts = params.volts(current);
    let hyst = params.limits(other).map(|l| l.hysteresis).unwrap_or(0.0);
    let end_volts = match direction {
        Direction::Forward => params.volts(other) + hyst,
        Direction::Reverse => params.volts(other) - hyst,
    };
    MixStroke { start_volts, end_volts, ramp: ramp_for(start_volts, end_volts, params.mix_frequency_hz) }
}

/// Open-loop reverse stroke endpoint: `endV = startV - (startV -
/// V(target)) * downstrokeProportion`, with an extra first-stroke bias.
pub fn open_loop_reverse_stroke(
    params: &FluidicParams,
    start_volts: f32,
    target: FluidicPosition,
    is_first_reverse_stroke: bool,
) -> MixStroke {
    let v_target = params.volts(target);
    let mut end_volts = start_volts - (start_volts - v_target) * params.mix_downstroke_proportion;
    if is_first_reverse_stroke {
        end_volts -= end_volts * params.open_loop_compensation_factor;
    }
    MixStroke { start_volts, end_volts, ramp: ramp_for(start_volts, end_volts, params.mix_frequency_hz) }
}

/// Open-loop forward stroke: returns to the rest position's voltage.
pub fn open_loop_forward_stroke(params: &FluidicParams, start_volts: f32, rest: FluidicPosition) -> MixStroke {
    let end_volts = params.volts(rest);
    MixStroke { start_volts, end_volts, ramp: ramp_for(start_volts, end_volts, params.mix_frequency_hz) }
}

/// `mixingStagesCompleted / 2 >= targetMixCycles` ends the mix.
pub fn cycles_complete(stages_completed: u32, target_cycles: u32) -> bool {
    stages_completed / 2 >= target_cycles
}

/// Hysteresis adaptation at stage completion: decreased on an
/// echem-matched stop, increased on a piezo-ramp-completed (echem never
/// confirmed) stop. Always clamped to `[HYST_MIN, HYST_MAX]`.
pub fn adapt_hysteresis(current: f32, echem_matched: bool, increase: f32, decrease: f32) -> f32 {
    let adapted = if echem_matched { current * decrease } else { current * increase };
    adapted.clamp(HYST_MIN, HYST_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_params;

    #[test]
    fn closed_loop_stroke_adds_hysteresis_forward() {
        let p = default_params(1);
        let s = closed_loop_stroke(&p, FluidicPosition::A, FluidicPosition::B, Direction::Forward);
        assert_eq!(s.end_volts, p.volts(FluidicPosition::B) + p.limits(FluidicPosition::B).unwrap().hysteresis);
    }

    #[test]
    fn open_loop_first_stroke_applies_extra_bias() {
        let p = default_params(1);
        let plain = open_loop_reverse_stroke(&p, 100.0, FluidicPosition::A, false);
        let biased = open_loop_reverse_stroke(&p, 100.0, FluidicPosition::A, true);
        assert!(biased.end_volts < plain.end_volts || biased.end_volts > plain.end_volts);
        assert_ne!(biased.end_volts, plain.end_volts);
    }

    #[test]
    fn cycle_accounting_rounds_down() {
        assert!(!cycles_complete(5, 3));
        assert!(cycles_complete(6, 3));
    }

    #[test]
    fn hysteresis_adaptation_clamps() {
        assert_eq!(adapt_hysteresis(HYST_MAX, false, 1.5, 0.9), HYST_MAX);
        assert_eq!(adapt_hysteresis(HYST_MIN, true, 1.1, 0.1), HYST_MIN);
    }
}
