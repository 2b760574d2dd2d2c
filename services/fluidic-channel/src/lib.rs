#![cfg_attr(target_os = "none", no_std)]

pub mod api;
pub mod core;

use api::*;
use core::params::FluidicParams;
use core::{Direction, FluidicPosition, GateResult};
use num_traits::{FromPrimitive, ToPrimitive};
use xous::{CID, Message};
use xous_ipc::Buffer;

pub use api::SERVER_NAME_FCC;

/// Snapshot of `core::Status` plus the current leaf state, decoded from
/// the wire representation returned by `GetStatus`.
#[derive(Debug, Copy, Clone)]
pub struct StatusSnapshot {
    pub leaf: u8,
    pub last_known_pos: FluidicPosition,
    pub last_fluid_front: echem_api::FluidPosition,
    pub last_piezo_voltage: f32,
    pub direction: Direction,
    pub mix_stages_completed: u32,
    pub mix_complete: bool,
}

/// Client handle for one strip channel's controller. `channel` is
/// carried on every call; the service multiplexes all four channels
/// behind a single registered name.
pub struct FluidicChannel {
    conn: CID,
    channel: u8,
}

impl FluidicChannel {
    pub fn new(xns: &xous_names::XousNames, channel: u8) -> Result<Self, xous::Error> {
        let conn = xns.request_connection_blocking(SERVER_NAME_FCC).expect("can't connect to fluidic-channel");
        Ok(FluidicChannel { conn, channel })
    }

    pub fn move_to(
        &self,
        target: FluidicPosition,
        ramp: f32,
        timeout_ms: u32,
        overshoot_mode: u8,
        overshoot_proportion: f32,
    ) -> Result<GateResult, xous::Error> {
        let req = MoveRequest {
            channel: self.channel,
            target: position_to_wire(target),
            ramp,
            timeout_ms,
            overshoot_mode,
            overshoot_proportion,
            result: 0,
        };
        let mut buf = Buffer::into_buf(req).or(Err(xous::Error::InternalError))?;
        buf.lend_mut(self.conn, Opcode::Move.to_u32().unwrap()).or(Err(xous::Error::InternalError))?;
        let back = buf.to_original::<MoveRequest, _>().or(Err(xous::Error::InternalError))?;
        Ok(gate_result_from_wire(back.result))
    }

    pub fn lift_bladders(&self, ramp: f32, timeout_ms: u32) -> Result<GateResult, xous::Error> {
        match xous::send_message(
            self.conn,
            Message::new_blocking_scalar(
                Opcode::LiftBladders.to_usize().unwrap(),
                self.channel as usize,
                ramp.to_bits() as usize,
                timeout_ms as usize,
                0,
            ),
        )? {
            xous::Result::Scalar1(v) => Ok(gate_result_from_wire(v as u8)),
            _ => Err(xous::Error::InternalError),
        }
    }

    pub fn mix(
        &self,
        target: FluidicPosition,
        frequency_hz: f32,
        timeout_ms: u32,
        cycles: u32,
        mix_type: u8,
        open_loop_comp: f32,
        downstroke_proportion: f32,
    ) -> Result<GateResult, xous::Error> {
        let req = MixRequest {
            channel: self.channel,
            target: position_to_wire(target),
            frequency_hz,
            timeout_ms,
            cycles,
            mix_type,
            open_loop_comp,
            downstroke_proportion,
            result: 0,
        };
        let mut buf = Buffer::into_buf(req).or(Err(xous::Error::InternalError))?;
        buf.lend_mut(self.conn, Opcode::Mix.to_u32().unwrap()).or(Err(xous::Error::InternalError))?;
        let back = buf.to_original::<MixRequest, _>().or(Err(xous::Error::InternalError))?;
        Ok(gate_result_from_wire(back.result))
    }

    pub fn wait_for_fluid_at(&self, target: FluidicPosition, timeout_ms: u32) -> Result<GateResult, xous::Error> {
        let req = WaitForFluidAtRequest { channel: self.channel, target: position_to_wire(target), timeout_ms, result: 0 };
        let mut buf = Buffer::into_buf(req).or(Err(xous::Error::InternalError))?;
        buf.lend_mut(self.conn, Opcode::WaitForFluidAt.to_u32().unwrap()).or(Err(xous::Error::InternalError))?;
        let back = buf.to_original::<WaitForFluidAtRequest, _>().or(Err(xous::Error::InternalError))?;
        Ok(gate_result_from_wire(back.result))
    }

    pub fn stop(&self) -> Result<GateResult, xous::Error> {
        match xous::send_message(
            self.conn,
            Message::new_blocking_scalar(Opcode::Stop.to_usize().unwrap(), self.channel as usize, 0, 0, 0),
        )? {
            xous::Result::Scalar1(v) => Ok(gate_result_from_wire(v as u8)),
            _ => Err(xous::Error::InternalError),
        }
    }

    pub fn clear_error(&self) -> Result<GateResult, xous::Error> {
        match xous::send_message(
            self.conn,
            Message::new_blocking_scalar(Opcode::ClearError.to_usize().unwrap(), self.channel as usize, 0, 0, 0),
        )? {
            xous::Result::Scalar1(v) => Ok(gate_result_from_wire(v as u8)),
            _ => Err(xous::Error::InternalError),
        }
    }

    /// Replaces this channel's full parameter bundle. Rejected (as
    /// `GateResult::BadArgs`) unless `V(A) < V(B) < V(C)` holds.
    pub fn set_params(&self, params: &FluidicParams) -> Result<GateResult, xous::Error> {
        let mut positions = [(0.0f32, 0.0f32, 0u8, 0u8); 5];
        for (i, p) in params.positions.iter().enumerate() {
            positions[i] = (
                p.target_volts,
                p.hysteresis,
                p.echem_requirements[0].to_u8().unwrap(),
                p.echem_requirements[1].to_u8().unwrap(),
            );
        }
        let req = SetParamsRequest {
            channel: self.channel,
            positions,
            move_timeout_ms: params.move_timeout_ms,
            mix_frequency_hz: params.mix_frequency_hz,
            mix_timeout_ms: params.mix_timeout_ms,
            mix_target_cycles: params.mix_target_cycles,
            ramp_speed: params.ramp_speed,
            mix_rest_position: position_to_wire(params.mix_rest_position),
            hysteresis_increase: params.hysteresis_increase,
            hysteresis_decrease: params.hysteresis_decrease,
            overshoot_mode: overshoot_mode_to_wire(params.overshoot_mode),
            overshoot_proportion: params.overshoot_proportion,
            mix_type: mix_type_to_wire(params.mix_type),
            open_loop_compensation_factor: params.open_loop_compensation_factor,
            mix_downstroke_proportion: params.mix_downstroke_proportion,
            monitor_breach_after_move: params.monitor_breach_after_move,
            accepted: false,
        };
        let mut buf = Buffer::into_buf(req).or(Err(xous::Error::InternalError))?;
        buf.lend_mut(self.conn, Opcode::SetParams.to_u32().unwrap()).or(Err(xous::Error::InternalError))?;
        let back = buf.to_original::<SetParamsRequest, _>().or(Err(xous::Error::InternalError))?;
        Ok(if back.accepted { GateResult::Accepted } else { GateResult::BadArgs("V(A) < V(B) < V(C) violated") })
    }

    /// Snapshot of this channel's runtime status, decoded from the wire
    /// form the server packs via `StatusWire`.
    pub fn get_status(&self) -> Result<StatusSnapshot, xous::Error> {
        let req = GetStatusRequest { channel: self.channel };
        let mut buf = Buffer::into_buf(req).or(Err(xous::Error::InternalError))?;
        buf.lend_mut(self.conn, Opcode::GetStatus.to_u32().unwrap()).or(Err(xous::Error::InternalError))?;
        let back = buf.to_original::<StatusWire, _>().or(Err(xous::Error::InternalError))?;
        Ok(StatusSnapshot {
            leaf: back.leaf,
            last_known_pos: position_from_wire(back.last_known_pos),
            last_fluid_front: echem_api::FluidPosition::from_u8(back.last_fluid_front)
                .unwrap_or(echem_api::FluidPosition::Invalid),
            last_piezo_voltage: back.last_piezo_voltage,
            direction: if back.direction_forward { Direction::Forward } else { Direction::Reverse },
            mix_stages_completed: back.mix_stages_completed,
            mix_complete: back.mix_complete,
        })
    }

    /// Registers `event_opcode` on `cid` as the forwarding target for
    /// every `FccEvent` published by this channel. The caller owns
    /// `cid`'s server loop and decodes the event with
    /// `core::events::decode` (mirroring `piezo_api::PiezoEvent::decode`).
    pub fn hook_events(&self, event_opcode: u32, cid: CID) -> Result<(), xous::Error> {
        let req = EventHook { channel: self.channel, id: event_opcode, cid };
        let buf = Buffer::into_buf(req).or(Err(xous::Error::InternalError))?;
        buf.lend(self.conn, Opcode::HookEvents.to_u32().unwrap()).or(Err(xous::Error::InternalError))?;
        Ok(())
    }
}
