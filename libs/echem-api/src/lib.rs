#![cfg_attr(target_os = "none", no_std)]

//! Client API for the electrochemical fluid-front detector.
//!
//! Signal conditioning and the calibration curve live in the driver
//! service itself, out of scope here (non-goal). This crate describes
//! only the enable/disable/read surface a channel controller uses, plus
//! the fluid-status and bladder-contact events the driver publishes.

pub mod api;
pub use api::*;

use num_traits::{FromPrimitive, ToPrimitive};
use xous::{send_message, Message, CID};

pub const SERVER_NAME_ECHEM: &str = "_Electrochemistry driver_";

#[derive(Debug)]
pub struct EchemDriver {
    conn: CID,
    channel: u8,
}

impl EchemDriver {
    pub fn new(xns: &xous_names::XousNames, channel: u8) -> Result<Self, xous::Error> {
        let conn = xns.request_connection_blocking(SERVER_NAME_ECHEM).expect("can't connect to echem driver");
        Ok(EchemDriver { conn, channel })
    }

    /// Enable detection of fluid reaching at least `min_contact`.
    pub fn set_mode_fill_detect(&self, min_contact: FluidPosition) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(
                Opcode::SetModeFillDetect.to_usize().unwrap(),
                self.channel as usize,
                min_contact.to_usize().unwrap(),
                0,
                0,
            ),
        )
        .map(|_| ())
    }

    pub fn disable(&self) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(Opcode::Disable.to_usize().unwrap(), self.channel as usize, 0, 0, 0),
        )
        .map(|_| ())
    }

    pub fn get_fluid_position(&self) -> Result<FluidPosition, xous::Error> {
        match send_message(
            self.conn,
            Message::new_blocking_scalar(
                Opcode::GetFluidPosition.to_usize().unwrap(),
                self.channel as usize,
                0,
                0,
                0,
            ),
        )? {
            xous::Result::Scalar1(code) => {
                FromPrimitive::from_usize(code).ok_or(xous::Error::InternalError)
            }
            _ => Err(xous::Error::InternalError),
        }
    }

    /// Register for `FluidStatusChanged`/`EchemError`, delivered as a
    /// memory message carrying all four channels' readings.
    pub fn hook_events(&self, event_opcode: u32, cid: CID) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(
                Opcode::HookEvents.to_usize().unwrap(),
                self.channel as usize,
                event_opcode as usize,
                cid as usize,
                0,
            ),
        )
        .map(|_| ())
    }

    /// Register for the shared bladder up/down broadcast: bladder
    /// detection is a single service shared across all four channels.
    pub fn hook_bladder_events(&self, event_opcode: u32, cid: CID) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(
                Opcode::HookBladderEvents.to_usize().unwrap(),
                self.channel as usize,
                event_opcode as usize,
                cid as usize,
                0,
            ),
        )
        .map(|_| ())
    }
}

/// All four channels' current fluid-front readings, as delivered in a
/// `FluidStatusChanged` memory message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidStatusChanged {
    pub per_channel_positions: [FluidPosition; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BladderEvent {
    Up(BladderChannel),
    Down(BladderChannel),
}

impl BladderEvent {
    pub fn decode(arg1: usize, arg2: usize) -> Option<BladderEvent> {
        let bladder: BladderChannel = FromPrimitive::from_usize(arg2)?;
        match arg1 {
            0 => Some(BladderEvent::Down(bladder)),
            1 => Some(BladderEvent::Up(bladder)),
            _ => None,
        }
    }
}
