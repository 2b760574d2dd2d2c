#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

mod api;
mod core;

use api::*;
use core::{Action, Command, Controller, ControllerEvent, FccEvent, GateResult};
use num_traits::{FromPrimitive, ToPrimitive};
use xous::{msg_blocking_scalar_unpack, Message, CID};
use xous_ipc::Buffer;

const NUM_CHANNELS: usize = 4;

struct ChannelState {
    controller: Controller,
    piezo: piezo_api::PiezoDriver,
    echem: echem_api::EchemDriver,
    listener: Option<(u32, CID)>,
}

impl ChannelState {
    fn new(xns: &xous_names::XousNames, channel: u8) -> Self {
        ChannelState {
            controller: Controller::new(core::config::default_params(channel)),
            piezo: piezo_api::PiezoDriver::new(xns, channel).expect("cannot connect to piezo driver"),
            echem: echem_api::EchemDriver::new(xns, channel).expect("cannot connect to echem driver"),
            listener: None,
        }
    }

    fn channel(&self) -> u8 {
        self.controller.params.channel
    }

    /// Drains a `Controller::dispatch`/`handle_command` outbox against the
    /// real drivers, in order. This is the only place in the crate that
    /// turns an `Action` into an `xous::send_message` call.
    fn run(&mut self, outbox: core::Outbox) {
        for action in outbox {
            match action {
                Action::StartPiezoMove { target_volts, ramp_speed, publish_completion } => {
                    if let Err(e) = self.piezo.set_voltage(target_volts, ramp_speed, publish_completion) {
                        log::warn!("channel {}: set_voltage failed: {:?}", self.channel(), e);
                    }
                }
                Action::StopPiezo => {
                    if let Err(e) = self.piezo.stop() {
                        log::warn!("channel {}: piezo stop failed: {:?}", self.channel(), e);
                    }
                }
                Action::HomePiezo => {
                    if let Err(e) = self.piezo.home() {
                        log::warn!("channel {}: piezo home failed: {:?}", self.channel(), e);
                    }
                }
                Action::EnableEchemFillDetect { min_contact } => {
                    if let Err(e) = self.echem.set_mode_fill_detect(min_contact) {
                        log::warn!("channel {}: echem enable failed: {:?}", self.channel(), e);
                    }
                }
                Action::DisableEchem => {
                    // Disable's result on idle entry is logged but never escalated.
                    if let Err(e) = self.echem.disable() {
                        log::debug!("channel {}: echem disable: {:?}", self.channel(), e);
                    }
                }
                Action::StartTimer | Action::StopTimer | Action::StartMixTimer | Action::StopMixTimer => {
                    // The 20 ms pump thread runs continuously for every
                    // channel regardless of leaf state; ticks delivered
                    // outside an active move/mix are no-ops inside
                    // `Controller::dispatch`, so there is nothing to start
                    // or stop at the driver layer.
                }
                Action::Publish(event) => self.publish(event),
                Action::ReportError(error) => {
                    if error.is_critical() {
                        log::error!("channel {}: {}", self.channel(), error);
                    } else {
                        log::warn!("channel {}: {}", self.channel(), error);
                    }
                }
            }
        }
    }

    fn publish(&self, event: FccEvent) {
        if let Some((opcode, cid)) = self.listener {
            let (kind, channel, arg3, arg4) = event.encode(self.channel());
            if let Err(e) = xous::send_message(cid, Message::new_scalar(opcode as usize, kind, channel, arg3, arg4)) {
                log::warn!("channel {}: event forward failed: {:?}", self.channel(), e);
            }
        }
    }
}

fn channel_index(channel: u8) -> Option<usize> {
    if (1..=NUM_CHANNELS as u8).contains(&channel) {
        Some(channel as usize - 1)
    } else {
        None
    }
}

#[xous::xous_main]
fn xmain() -> ! {
    log_server::init_wait().unwrap();
    log::set_max_level(log::LevelFilter::Info);
    log::info!("my PID is {}", xous::process::id());

    let xns = xous_names::XousNames::new().unwrap();
    let fcc_sid = xns.register_name(SERVER_NAME_FCC, None).expect("can't register server");
    let self_cid = xous::connect(fcc_sid).unwrap();

    let mut channels: Vec<ChannelState> = (1..=NUM_CHANNELS as u8).map(|ch| ChannelState::new(&xns, ch)).collect();

    // Each channel's bender is addressed independently, so each gets its
    // own listener registration (piezo_api::hook_events carries the
    // channel in its wire args). The echem driver broadcasts one
    // `FluidStatusChanged` reading for all four channels at once, and the
    // bladder-detect broadcast is likewise shared, so those two hooks are
    // only registered once, through channel 1's connection, to avoid
    // receiving (and re-dispatching) the same broadcast four times over.
    for ch in channels.iter() {
        if let Err(e) = ch.piezo.hook_events(Opcode::PiezoEvent.to_u32().unwrap(), self_cid) {
            log::warn!("channel {}: piezo hook_events failed: {:?}", ch.channel(), e);
        }
    }
    if let Err(e) = channels[0].echem.hook_events(Opcode::EchemEvent.to_u32().unwrap(), self_cid) {
        log::warn!("echem hook_events failed: {:?}", e);
    }
    if let Err(e) = channels[0].echem.hook_bladder_events(Opcode::EchemBladderEvent.to_u32().unwrap(), self_cid) {
        log::warn!("echem hook_bladder_events failed: {:?}", e);
    }

    // A single auxiliary thread pumps the 20 ms tick for every channel,
    // the same shape as the debounce timer thread in
    // `services/keyboard-backlight`, synchronised back via a
    // self-connection rather than shared state.
    std::thread::spawn(move || {
        let tt = ticktimer_server::Ticktimer::new().expect("can't connect to ticktimer");
        let tick_conn = xous::connect(fcc_sid).unwrap();
        loop {
            tt.sleep_ms(core::constants::FLUIDIC_TIMER_COUNT_MS as usize).ok();
            if xous::send_message(tick_conn, Message::new_scalar(Opcode::Tick.to_usize().unwrap(), 0, 0, 0, 0)).is_err() {
                break;
            }
        }
    });

    loop {
        let mut msg = xous::receive_message(fcc_sid).unwrap();
        let opcode: Option<Opcode> = FromPrimitive::from_usize(msg.body.id());
        match opcode {
            Some(Opcode::Move) => {
                let mut buffer = unsafe { Buffer::from_memory_message_mut(msg.body.memory_message_mut().unwrap()) };
                let mut req = buffer.to_original::<MoveRequest, _>().unwrap();
                let result = match channels.get_mut(req.channel as usize - 1) {
                    Some(ch) => {
                        let cmd = Command::Move {
                            target: position_from_wire(req.target),
                            ramp: req.ramp,
                            timeout_ms: req.timeout_ms,
                            overshoot_mode: overshoot_mode_from_wire(req.overshoot_mode),
                            overshoot_proportion: req.overshoot_proportion,
                        };
                        let (gate, outbox) = ch.controller.handle_command(cmd);
                        if gate != GateResult::Accepted {
                            log::warn!("channel {}: Move rejected: {:?}", ch.channel(), gate);
                        }
                        ch.run(outbox);
                        gate
                    }
                    None => GateResult::BadArgs("channel out of range"),
                };
                req.result = gate_result_to_wire(result);
                buffer.replace(req).unwrap();
            }
            Some(Opcode::Mix) => {
                let mut buffer = unsafe { Buffer::from_memory_message_mut(msg.body.memory_message_mut().unwrap()) };
                let mut req = buffer.to_original::<MixRequest, _>().unwrap();
                let result = match channels.get_mut(req.channel as usize - 1) {
                    Some(ch) => {
                        let cmd = Command::Mix {
                            target: position_from_wire(req.target),
                            frequency_hz: req.frequency_hz,
                            timeout_ms: req.timeout_ms,
                            cycles: req.cycles,
                            mix_type: mix_type_from_wire(req.mix_type),
                            open_loop_comp: req.open_loop_comp,
                            downstroke_proportion: req.downstroke_proportion,
                        };
                        let (gate, outbox) = ch.controller.handle_command(cmd);
                        if gate != GateResult::Accepted {
                            log::warn!("channel {}: Mix rejected: {:?}", ch.channel(), gate);
                        }
                        ch.run(outbox);
                        gate
                    }
                    None => GateResult::BadArgs("channel out of range"),
                };
                req.result = gate_result_to_wire(result);
                buffer.replace(req).unwrap();
            }
            Some(Opcode::WaitForFluidAt) => {
                let mut buffer = unsafe { Buffer::from_memory_message_mut(msg.body.memory_message_mut().unwrap()) };
                let mut req = buffer.to_original::<WaitForFluidAtRequest, _>().unwrap();
                let result = match channels.get_mut(req.channel as usize - 1) {
                    Some(ch) => {
                        let cmd = Command::WaitForFluidAt { target: position_from_wire(req.target), timeout_ms: req.timeout_ms };
                        let (gate, outbox) = ch.controller.handle_command(cmd);
                        if gate != GateResult::Accepted {
                            log::warn!("channel {}: WaitForFluidAt rejected: {:?}", ch.channel(), gate);
                        }
                        ch.run(outbox);
                        gate
                    }
                    None => GateResult::BadArgs("channel out of range"),
                };
                req.result = gate_result_to_wire(result);
                buffer.replace(req).unwrap();
            }
            Some(Opcode::SetParams) => {
                let mut buffer = unsafe { Buffer::from_memory_message_mut(msg.body.memory_message_mut().unwrap()) };
                let mut req = buffer.to_original::<SetParamsRequest, _>().unwrap();
                let accepted = match channels.get_mut(req.channel as usize - 1) {
                    Some(ch) => {
                        let mut params = ch.controller.params;
                        params.channel = req.channel;
                        for (i, p) in params.positions.iter_mut().enumerate() {
                            let (volts, hysteresis, fwd, rev) = req.positions[i];
                            p.target_volts = volts;
                            p.hysteresis = hysteresis;
                            p.echem_requirements = [
                                echem_api::FluidPosition::from_u8(fwd).unwrap_or(echem_api::FluidPosition::Invalid),
                                echem_api::FluidPosition::from_u8(rev).unwrap_or(echem_api::FluidPosition::Invalid),
                            ];
                        }
                        params.move_timeout_ms = req.move_timeout_ms;
                        params.mix_frequency_hz = req.mix_frequency_hz;
                        params.mix_timeout_ms = req.mix_timeout_ms;
                        params.mix_target_cycles = req.mix_target_cycles;
                        params.ramp_speed = req.ramp_speed;
                        params.mix_rest_position = position_from_wire(req.mix_rest_position);
                        params.hysteresis_increase = req.hysteresis_increase;
                        params.hysteresis_decrease = req.hysteresis_decrease;
                        params.overshoot_mode = overshoot_mode_from_wire(req.overshoot_mode);
                        params.overshoot_proportion = req.overshoot_proportion;
                        params.mix_type = mix_type_from_wire(req.mix_type);
                        params.open_loop_compensation_factor = req.open_loop_compensation_factor;
                        params.mix_downstroke_proportion = req.mix_downstroke_proportion;
                        params.monitor_breach_after_move = req.monitor_breach_after_move;
                        let (gate, _outbox) = ch.controller.handle_command(Command::SetParams(params));
                        gate == GateResult::Accepted
                    }
                    None => false,
                };
                req.accepted = accepted;
                buffer.replace(req).unwrap();
            }
            Some(Opcode::GetStatus) => {
                let mut buffer = unsafe { Buffer::from_memory_message_mut(msg.body.memory_message_mut().unwrap()) };
                let req = buffer.to_original::<GetStatusRequest, _>().unwrap();
                let wire = match channels.get(req.channel as usize - 1) {
                    Some(ch) => {
                        let st = &ch.controller.status;
                        StatusWire {
                            leaf: ch.controller.state.leaf as u8,
                            last_known_pos: position_to_wire(ch.controller.state.last_known_pos),
                            last_fluid_front: st.last_fluid_front.to_u8().unwrap(),
                            last_piezo_voltage: st.last_piezo_voltage,
                            direction_forward: ch.controller.state.direction == core::Direction::Forward,
                            mix_stages_completed: st.mix_stages_completed,
                            mix_complete: st.mix_complete,
                        }
                    }
                    None => StatusWire {
                        leaf: 0,
                        last_known_pos: 0,
                        last_fluid_front: 0,
                        last_piezo_voltage: 0.0,
                        direction_forward: true,
                        mix_stages_completed: 0,
                        mix_complete: false,
                    },
                };
                buffer.replace(wire).unwrap();
            }
            Some(Opcode::HookEvents) => {
                let buffer = unsafe { Buffer::from_memory_message(msg.body.memory_message().unwrap()) };
                let req = buffer.to_original::<EventHook, _>().unwrap();
                if let Some(ch) = channels.get_mut(req.channel as usize - 1) {
                    ch.listener = Some((req.id, req.cid));
                } else {
                    log::warn!("HookEvents: channel {} out of range", req.channel);
                }
            }
            Some(Opcode::LiftBladders) => msg_blocking_scalar_unpack!(msg, channel, ramp_bits, timeout_ms, _, {
                let result = match channels.get_mut(channel - 1) {
                    Some(ch) => {
                        let cmd = Command::LiftBladders { ramp: f32::from_bits(ramp_bits as u32), timeout_ms: timeout_ms as u32 };
                        let (gate, outbox) = ch.controller.handle_command(cmd);
                        ch.run(outbox);
                        gate
                    }
                    None => GateResult::BadArgs("channel out of range"),
                };
                xous::return_scalar(msg.sender, gate_result_to_wire(result) as usize).ok();
            }),
            Some(Opcode::Stop) => msg_blocking_scalar_unpack!(msg, channel, _, _, _, {
                let result = match channels.get_mut(channel - 1) {
                    Some(ch) => {
                        let (gate, outbox) = ch.controller.handle_command(Command::Stop);
                        ch.run(outbox);
                        gate
                    }
                    None => GateResult::BadArgs("channel out of range"),
                };
                xous::return_scalar(msg.sender, gate_result_to_wire(result) as usize).ok();
            }),
            Some(Opcode::ClearError) => msg_blocking_scalar_unpack!(msg, channel, _, _, _, {
                let result = match channels.get_mut(channel - 1) {
                    Some(ch) => {
                        let (gate, outbox) = ch.controller.handle_command(Command::ClearError);
                        ch.run(outbox);
                        gate
                    }
                    None => GateResult::BadArgs("channel out of range"),
                };
                xous::return_scalar(msg.sender, gate_result_to_wire(result) as usize).ok();
            }),
            Some(Opcode::Tick) => {
                for ch in channels.iter_mut() {
                    let outbox = ch.controller.dispatch(ControllerEvent::Tick);
                    ch.run(outbox);
                }
            }
            Some(Opcode::PiezoEvent) => xous::msg_scalar_unpack!(msg, a1, a2, a3, a4, {
                if let Some(ev) = piezo_api::PiezoEvent::decode(a1, a2, a3, a4) {
                    let (channel, event) = match ev {
                        piezo_api::PiezoEvent::MoveComplete { channel, voltage } => {
                            (channel, ControllerEvent::PiezoMoveComplete { channel, voltage })
                        }
                        piezo_api::PiezoEvent::Stopped { channel, voltage } => {
                            (channel, ControllerEvent::PiezoStopped { channel, voltage })
                        }
                        piezo_api::PiezoEvent::MoveFail { channel, .. } => {
                            (channel, ControllerEvent::PiezoMoveFail { channel })
                        }
                    };
                    if let Some(ch) = channel_index(channel).and_then(|i| channels.get_mut(i)) {
                        let outbox = ch.controller.dispatch(event);
                        ch.run(outbox);
                    }
                }
            }),
            Some(Opcode::EchemEvent) => {
                if let Some(mm) = msg.body.memory_message() {
                    let buffer = unsafe { Buffer::from_memory_message(mm) };
                    let wire = buffer.to_original::<FluidStatusChangedWire, _>().unwrap();
                    let mut per_channel_positions = [echem_api::FluidPosition::Invalid; 4];
                    for (i, v) in wire.per_channel_positions.iter().enumerate() {
                        per_channel_positions[i] =
                            echem_api::FluidPosition::from_u8(*v).unwrap_or(echem_api::FluidPosition::Invalid);
                    }
                    for ch in channels.iter_mut() {
                        let outbox = ch.controller.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions });
                        ch.run(outbox);
                    }
                } else {
                    xous::msg_scalar_unpack!(msg, channel, _, _, _, {
                        if let Some(ch) = channel_index(channel as u8).and_then(|i| channels.get_mut(i)) {
                            let outbox = ch.controller.dispatch(ControllerEvent::EchemError { channel: channel as u8 });
                            ch.run(outbox);
                        }
                    });
                }
            }
            Some(Opcode::EchemBladderEvent) => xous::msg_scalar_unpack!(msg, a1, a2, _, _, {
                if let Some(ev) = echem_api::BladderEvent::decode(a1, a2) {
                    for ch in channels.iter_mut() {
                        let event = match ev {
                            echem_api::BladderEvent::Up(bladder) => ControllerEvent::BladderUp { bladder },
                            echem_api::BladderEvent::Down(bladder) => ControllerEvent::BladderDown { bladder },
                        };
                        let outbox = ch.controller.dispatch(event);
                        ch.run(outbox);
                    }
                }
            }),
            Some(Opcode::DoorOpened) => xous::msg_scalar_unpack!(msg, channel, _, _, _, {
                if let Some(ch) = channel_index(channel as u8).and_then(|i| channels.get_mut(i)) {
                    let outbox = ch.controller.dispatch(ControllerEvent::DoorOpened);
                    ch.run(outbox);
                }
            }),
            Some(Opcode::GlobalHalt) => {
                for ch in channels.iter_mut() {
                    let outbox = ch.controller.dispatch(ControllerEvent::GlobalHalt);
                    ch.run(outbox);
                }
            }
            Some(Opcode::MixContinue) => xous::msg_scalar_unpack!(msg, channel, _, _, _, {
                if let Some(ch) = channel_index(channel as u8).and_then(|i| channels.get_mut(i)) {
                    let outbox = ch.controller.dispatch(ControllerEvent::MixContinue);
                    ch.run(outbox);
                }
            }),
            None => log::warn!("unrecognized opcode: {:?}", msg.body.id()),
        }
    }
}
