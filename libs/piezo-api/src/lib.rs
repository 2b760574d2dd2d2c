#![cfg_attr(target_os = "none", no_std)]

//! Client API for the piezoelectric bender driver.
//!
//! This crate is deliberately thin: the piezo driver itself (ramp
//! generation, calibration, the analog front end) lives in a separate
//! service and is out of scope here. This crate only describes the four
//! operations a channel controller is allowed to invoke, and the three
//! events the driver publishes back.

pub mod api;
pub use api::*;

use num_traits::{FromPrimitive, ToPrimitive};
use xous::{send_message, Message, CID};

pub const SERVER_NAME_PIEZO: &str = "_Piezo bender driver_";

/// Thin client handle to one piezo driver channel. The driver itself is a
/// single shared service (four benders, one process); channel identity is
/// carried as an argument on every call, the same way the echem driver
/// addresses its four channels.
#[derive(Debug)]
pub struct PiezoDriver {
    conn: CID,
    channel: u8,
}

impl PiezoDriver {
    pub fn new(xns: &xous_names::XousNames, channel: u8) -> Result<Self, xous::Error> {
        let conn = xns.request_connection_blocking(SERVER_NAME_PIEZO).expect("can't connect to piezo driver");
        Ok(PiezoDriver { conn, channel })
    }

    /// Start (or retarget) a ramp to `target_volts` at `ramp_speed` (V/s).
    /// `publish_completion` controls whether the driver emits
    /// `PiezoMoveComplete` on arrival (some secondary corrective moves
    /// suppress it).
    pub fn set_voltage(
        &self,
        target_volts: f32,
        ramp_speed: f32,
        publish_completion: bool,
    ) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(
                Opcode::SetVoltage.to_usize().unwrap(),
                target_volts.to_bits() as usize,
                ramp_speed.to_bits() as usize,
                publish_completion as usize,
                self.channel as usize,
            ),
        )
        .map(|_| ())
    }

    /// Halt the ramp in place.
    pub fn stop(&self) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(Opcode::Stop.to_usize().unwrap(), self.channel as usize, 0, 0, 0),
        )
        .map(|_| ())
    }

    /// Rapid return to `PIEZO_RAMP_MAX`.
    pub fn home(&self) -> Result<(), xous::Error> {
        send_message(
            self.conn,
            Message::new_scalar(Opcode::Home.to_usize().unwrap(), self.channel as usize, 0, 0, 0),
        )
        .map(|_| ())
    }

    /// Last known voltage, read-only.
    pub fn current_voltage(&self) -> Result<f32, xous::Error> {
        match send_message(
            self.conn,
            Message::new_blocking_scalar(
                Opcode::CurrentVoltage.to_usize().unwrap(),
                self.channel as usize,
                0,
                0,
                0,
            ),
        )? {
            xous::Result::Scalar1(bits) => Ok(f32::from_bits(bits as u32)),
            _ => Err(xous::Error::InternalError),
        }
    }

    /// Register a listener for `PiezoMoveComplete`/`PiezoStopped`/`PiezoMoveFail`.
    /// `cid` is the caller's own connection; events arrive as scalar
    /// messages on opcode `event_opcode`.
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
}

/// Events as delivered to a hooked listener. The scalar args are, in
/// order: `channel`, `voltage-bits`, `error-code-or-zero`, `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PiezoEvent {
    MoveComplete { channel: u8, voltage: f32 },
    Stopped { channel: u8, voltage: f32 },
    MoveFail { channel: u8, error: u32 },
}

impl PiezoEvent {
    pub fn decode(arg1: usize, arg2: usize, arg3: usize, arg4: usize) -> Option<PiezoEvent> {
        let channel = arg1 as u8;
        match FromPrimitive::from_usize(arg4) {
            Some(PiezoEventKind::MoveComplete) => {
                Some(PiezoEvent::MoveComplete { channel, voltage: f32::from_bits(arg2 as u32) })
            }
            Some(PiezoEventKind::Stopped) => {
                Some(PiezoEvent::Stopped { channel, voltage: f32::from_bits(arg2 as u32) })
            }
            Some(PiezoEventKind::MoveFail) => {
                Some(PiezoEvent::MoveFail { channel, error: arg3 as u32 })
            }
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub(crate) enum PiezoEventKind {
    MoveComplete,
    Stopped,
    MoveFail,
}
