//! Breach monitor: pure comparison of an observed fluid-front reading
//! against the required reading at a held contact.

use super::params::FluidicParams;
use super::position::{Direction, FluidicPosition};
use echem_api::FluidPosition;

/// `true` when `observed` no longer matches the Forward-lane requirement
/// at the held `position` — the trigger for `BreachDetected`.
pub fn is_breach(params: &FluidicParams, position: FluidicPosition, observed: FluidPosition) -> bool {
    let required = params.limits(position).map(|l| l.echem_requirement(Direction::Forward));
    match required {
        Some(req) => observed != req,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_params;

    #[test]
    fn matching_reading_is_not_a_breach() {
        let p = default_params(1);
        let req = p.limits(FluidicPosition::B).unwrap().echem_requirement(Direction::Forward);
        assert!(!is_breach(&p, FluidicPosition::B, req));
    }

    #[test]
    fn lower_reading_is_a_breach() {
        let p = default_params(1);
        assert!(is_breach(&p, FluidicPosition::B, FluidPosition::Fluid));
    }
}
