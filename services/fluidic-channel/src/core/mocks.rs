//! Deterministic fakes for the piezo and echem drivers, used only by
//! tests that want to drive a `Controller` through a full scenario
//! without a kernel underneath it.

#![cfg(test)]

use super::position::FluidicPosition;
use echem_api::{BladderChannel, FluidPosition};

#[derive(Debug, Default)]
pub struct MockPiezo {
    pub target_volts: f32,
    pub ramp_speed: f32,
    pub running: bool,
    pub stop_count: u32,
}

impl MockPiezo {
    pub fn set_voltage(&mut self, target_volts: f32, ramp_speed: f32) {
        self.target_volts = target_volts;
        self.ramp_speed = ramp_speed;
        self.running = true;
    }

    pub fn stop(&mut self) -> f32 {
        self.running = false;
        self.stop_count += 1;
        self.target_volts
    }
}

#[derive(Debug, Default)]
pub struct MockEchem {
    pub enabled: bool,
    pub min_contact: Option<FluidPosition>,
    pub reading: FluidPosition,
}

impl MockEchem {
    pub fn set_mode_fill_detect(&mut self, min_contact: FluidPosition) {
        self.enabled = true;
        self.min_contact = Some(min_contact);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.min_contact = None;
    }

    pub fn set_reading(&mut self, reading: FluidPosition) {
        self.reading = reading;
    }
}

/// Maps a strip position onto a plausible mock voltage, used only to
/// seed scenario tests; production voltages come from `FluidicParams`.
pub fn plausible_voltage(position: FluidicPosition) -> f32 {
    match position {
        FluidicPosition::Home => 200.0,
        FluidicPosition::Down => 0.0,
        FluidicPosition::A | FluidicPosition::B | FluidicPosition::C => 100.0,
        FluidicPosition::Unknown | FluidicPosition::None => 0.0,
    }
}

pub fn own_bladder(channel: u8) -> BladderChannel {
    BladderChannel::for_channel(channel).expect("channel 1..4")
}
