//! `Status`: runtime observations, separate from the persistent
//! controller state that survives across commands.

use super::position::Direction;
use echem_api::FluidPosition;

#[derive(Debug, Clone, Copy)]
pub struct Status {
    pub last_fluid_front: FluidPosition,
    pub last_piezo_voltage: f32,
    pub direction: Direction,
    pub mix_stages_completed: u32,
    pub mix_complete: bool,
}

impl Default for Status {
    fn default() -> Self {
        Status {
            last_fluid_front: FluidPosition::Invalid,
            last_piezo_voltage: 0.0,
            direction: Direction::Forward,
            mix_stages_completed: 0,
            mix_complete: false,
        }
    }
}
