//! Per-channel default-parameter bundles. These are the
//! "peripheral config" read once at construction and then owned mutably
//! by the FCC; they are plain `const`-built tables, not a file loaded at
//! runtime, matching the way `llio`/`rtc` hardcode their calibration
//! constants rather than pulling in a config-file crate.

use super::constants::*;
use super::params::{FluidicParams, MixType, OvershootMode, PositionLimits};
use super::position::FluidicPosition;
use echem_api::FluidPosition;

const SPEED_LOW_DEFAULT: f32 = 2.5;
const MIX_TIMEOUT_MAX_MS: u32 = 60 * 60 * 1000;
const HYSTERESIS_INCREASE_DEFAULT: f32 = 1.1;
const HYSTERESIS_DECREASE_DEFAULT: f32 = 0.9;

/// `positions` array layout: `[Home, Down, A, B, C]`, matching
/// `FluidicPosition::limits_index`.
fn default_position_limits() -> [PositionLimits; 5] {
    [
        PositionLimits {
            target_volts: PIEZO_RAMP_MAX_VOLTAGE,
            hysteresis: 0.0,
            echem_requirements: [FluidPosition::Invalid, FluidPosition::Invalid],
        },
        PositionLimits {
            target_volts: PIEZO_MIN_VOLTAGE,
            hysteresis: 0.0,
            echem_requirements: [FluidPosition::NoFluid, FluidPosition::Fluid],
        },
        PositionLimits {
            // common default until first reached and calibrated in place
            target_volts: 100.0,
            hysteresis: 10.0,
            echem_requirements: [FluidPosition::PositionA, FluidPosition::Fluid],
        },
        PositionLimits {
            target_volts: 100.0,
            hysteresis: 5.0,
            echem_requirements: [FluidPosition::PositionB, FluidPosition::PositionA],
        },
        PositionLimits {
            target_volts: 100.0,
            hysteresis: 5.0,
            echem_requirements: [FluidPosition::PositionC, FluidPosition::PositionB],
        },
    ]
}

/// Default parameter bundle for strip channel `channel` (1..4). All four
/// channels start identical; hosts differentiate them via `SetParams`
/// once per-strip calibration is known.
pub fn default_params(channel: u8) -> FluidicParams {
    debug_assert!((1..=4).contains(&channel));
    FluidicParams {
        positions: default_position_limits(),
        channel,
        move_timeout_ms: 30_000,
        mix_frequency_hz: 1.0,
        mix_timeout_ms: 30_000,
        mix_target_cycles: 3,
        ramp_speed: SPEED_LOW_DEFAULT,
        mix_timeout_max_ms: MIX_TIMEOUT_MAX_MS,
        mix_rest_position: FluidicPosition::B,
        hysteresis_increase: HYSTERESIS_INCREASE_DEFAULT,
        hysteresis_decrease: HYSTERESIS_DECREASE_DEFAULT,
        overshoot_mode: OvershootMode::None,
        overshoot_proportion: 0.0,
        mix_type: MixType::DualPointClosedLoop,
        open_loop_compensation_factor: 0.1,
        mix_downstroke_proportion: 0.5,
        monitor_breach_after_move: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_four_channels_build() {
        for ch in 1..=4u8 {
            let p = default_params(ch);
            assert_eq!(p.channel, ch);
        }
    }

    #[test]
    fn home_and_down_have_zero_hysteresis() {
        let p = default_params(1);
        assert_eq!(p.limits(FluidicPosition::Home).unwrap().hysteresis, 0.0);
        assert_eq!(p.limits(FluidicPosition::Down).unwrap().hysteresis, 0.0);
    }
}
