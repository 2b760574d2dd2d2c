//! Echem requirement resolver. Pure function: given
//! `(position, direction, is_moving)`, returns the fluid-detector reading
//! the controller should wait for.

use super::params::FluidicParams;
use super::position::{Direction, FluidicPosition};
use echem_api::FluidPosition;

pub fn required_reading(
    params: &FluidicParams,
    position: FluidicPosition,
    direction: Direction,
    is_moving: bool,
) -> FluidPosition {
    let lane = if is_moving {
        match direction {
            Direction::Reverse => direction,
            _ => Direction::Forward,
        }
    } else {
        // breach monitor: always the Forward lane of the held position
        Direction::Forward
    };
    params.limits(position).map(|l| l.echem_requirement(lane)).unwrap_or(FluidPosition::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_params;

    #[test]
    fn home_and_down_return_configured_sentinels() {
        let p = default_params(1);
        assert_eq!(
            required_reading(&p, FluidicPosition::Home, Direction::Forward, true),
            FluidPosition::Invalid
        );
        assert_eq!(
            required_reading(&p, FluidicPosition::Down, Direction::Reverse, true),
            FluidPosition::Fluid
        );
    }

    #[test]
    fn breach_monitor_always_uses_forward_lane() {
        let p = default_params(1);
        let moving = required_reading(&p, FluidicPosition::B, Direction::Reverse, false);
        assert_eq!(moving, p.limits(FluidicPosition::B).unwrap().echem_requirements[0]);
    }

    #[test]
    fn moving_reverse_uses_reverse_lane() {
        let p = default_params(1);
        let r = required_reading(&p, FluidicPosition::B, Direction::Reverse, true);
        assert_eq!(r, p.limits(FluidicPosition::B).unwrap().echem_requirements[1]);
    }
}
