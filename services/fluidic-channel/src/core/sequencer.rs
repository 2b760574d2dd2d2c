//! State sequencer: the hierarchical state machine at the
//! center of the FCC. `Controller::handle_command` answers the
//! synchronous gate questions (`Accepted`/`NotReady`/`BadArgs`/
//! `InvalidMove`) the way a blocking IPC call would; `Controller::dispatch`
//! drives every other event (timer ticks, driver callbacks, bus events)
//! and returns the `Outbox` for `main.rs` to execute.
//!
//! Design decision (not specified verbatim in the source table): a
//! `Move` whose target is `A`/`B`/`C` passes through `CheckForStrip`
//! first; a `Move` whose target is `Home` or `Down` goes straight to
//! `MoveOther`, since neither endpoint is bounded by fluid detection —
//! only by the piezo homing call or a bladder event.

use super::action::{Action, Outbox};
use super::breach;
use super::command_gate::{self, Command, GateResult};
use super::constants::*;
use super::echem;
use super::error::{CriticalError, FccError, MoveLocalError};
use super::error_arbiter;
use super::events::FccEvent;
use super::mix;
use super::params::{FluidicParams, MixType, OvershootMode};
use super::piezo_move;
use super::position::{Direction, FluidicPosition};
use super::status::Status;
use echem_api::{BladderChannel, FluidPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafState {
    Init,
    Idle,
    CheckForStrip,
    MoveContact,
    MoveOther,
    LiftUpBladder,
    WaitForContact,
    WaitForPiezoStop,
    MixContactControlled,
    MixPiezoControlled,
    MixWaitContinue,
    MonitorFluidBreach,
    Err,
}

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    ramp: f32,
    overshoot_mode: OvershootMode,
    overshoot_proportion: f32,
    publish_completion: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingMix {
    mix_type: MixType,
    frequency_hz: f32,
    timeout_ticks: u32,
    target_cycles: u32,
    open_loop_comp: f32,
    downstroke_proportion: f32,
    target: FluidicPosition,
    rest: FluidicPosition,
    first_reverse_stroke_done: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerState {
    pub leaf: LeafState,
    pub last_known_pos: FluidicPosition,
    pub target_pos: FluidicPosition,
    pub direction: Direction,
    ticks: u32,
    cmd_timeout_ticks: u32,
    target_reached_latch: bool,
    /// One-shot flag: `DoorOpened` clears it so the induced home move
    /// does not publish `MoveComplete`.
    publish_completion: bool,
    pending_move: Option<PendingMove>,
    pending_mix: Option<PendingMix>,
    error_count: u32,
    /// Set once `StartBladderDetect` has been published for the current
    /// `LiftUpBladder`/move-to-`Down`, 20 ms after entry. Gates the
    /// bladder latch: a stray event arriving before the delay elapsed is
    /// ignored, not just off-channel ones.
    bladder_detect_requested: bool,
    /// Set while the current `MoveContact`/`WaitForPiezoStop` residency is
    /// the post-mix "return to the configured rest position" move, not a
    /// caller-issued `Move`: its completion publishes `MixComplete` instead
    /// of `MoveComplete` and never enters `MonitorFluidBreach`.
    mix_return: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        ControllerState {
            leaf: LeafState::Idle,
            last_known_pos: FluidicPosition::Unknown,
            target_pos: FluidicPosition::None,
            direction: Direction::Forward,
            ticks: 0,
            cmd_timeout_ticks: 0,
            target_reached_latch: false,
            publish_completion: true,
            pending_move: None,
            pending_mix: None,
            error_count: 0,
            bladder_detect_requested: false,
            mix_return: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ControllerEvent {
    Tick,
    PiezoMoveComplete { channel: u8, voltage: f32 },
    PiezoStopped { channel: u8, voltage: f32 },
    PiezoMoveFail { channel: u8 },
    EchemStatusChanged { per_channel_positions: [FluidPosition; 4] },
    EchemError { channel: u8 },
    BladderUp { bladder: BladderChannel },
    BladderDown { bladder: BladderChannel },
    MixContinue,
    DoorOpened,
    GlobalHalt,
}

pub struct Controller {
    pub state: ControllerState,
    pub status: Status,
    pub params: FluidicParams,
}

fn ticks_from_ms(ms: u32) -> u32 {
    (ms + FLUIDIC_TIMER_COUNT_MS - 1) / FLUIDIC_TIMER_COUNT_MS
}

impl Controller {
    /// `Init`'s unconditional transition to `Idle` happens synchronously
    /// here; there is no event the outside world can observe in between.
    pub fn new(params: FluidicParams) -> Self {
        Controller { state: ControllerState::default(), status: Status::default(), params }
    }

    fn for_own_channel(&self, channel: u8) -> bool {
        channel == self.params.channel
    }

    fn own_bladder(&self) -> Option<BladderChannel> {
        BladderChannel::for_channel(self.params.channel)
    }

    fn elapsed_ms(&self) -> u32 {
        self.state.ticks * FLUIDIC_TIMER_COUNT_MS
    }

    // ---- leaf entry helpers ----------------------------------------

    fn enter_idle(&mut self, outbox: &mut Outbox) {
        let _ = outbox.push(Action::DisableEchem); // result is ignored if non-OK, only logged in main.rs
        let _ = outbox.push(Action::StopPiezo);
        let _ = outbox.push(Action::StopTimer);
        self.state.target_pos = FluidicPosition::None;
        self.state.direction = Direction::Forward;
        self.state.pending_move = None;
        self.state.pending_mix = None;
        self.state.target_reached_latch = false;
        self.state.bladder_detect_requested = false;
        self.state.mix_return = false;
        self.state.leaf = LeafState::Idle;
    }

    fn enter_err(&mut self, error: FccError, outbox: &mut Outbox) {
        let _ = outbox.push(Action::DisableEchem);
        let _ = outbox.push(Action::StopPiezo);
        self.status.last_fluid_front = FluidPosition::Invalid;
        self.state.last_known_pos = FluidicPosition::Unknown;
        let _ = outbox.push(Action::ReportError(error));
        self.state.leaf = LeafState::Err;
    }

    /// Route a classified error: critical errors force `Err` (unless
    /// already transitioning there); everything else reports and
    /// returns to `Idle`.
    fn fail(&mut self, error: FccError, fail_event: Option<FccEvent>, outbox: &mut Outbox) {
        if let Some(ev) = fail_event {
            let _ = outbox.push(Action::Publish(ev));
        }
        let error = if let FccError::MoveLocal(_) = error {
            self.state.error_count += 1;
            if self.state.error_count >= FLUIDIC_MAX_FAIL_COUNT {
                FccError::Critical(CriticalError::ErrorCountExceeded)
            } else {
                error
            }
        } else {
            error
        };
        let _ = outbox.push(Action::Publish(FccEvent::CommandFailed { error }));
        if error_arbiter::forces_err(error, self.state.leaf == LeafState::Err) {
            self.enter_err(error, outbox);
        } else {
            let _ = outbox.push(Action::ReportError(error));
            self.enter_idle(outbox);
        }
    }

    fn publish_move_complete(&mut self, outbox: &mut Outbox) {
        if self.state.publish_completion {
            let _ = outbox.push(Action::Publish(FccEvent::MoveComplete {
                channel: self.params.channel,
                rest_position: self.state.last_known_pos,
                elapsed_ms: self.elapsed_ms(),
                piezo_voltage: self.status.last_piezo_voltage,
            }));
        }
        self.state.publish_completion = true;
    }

    // ---- commands ----------------------------------------------------

    pub fn handle_command(&mut self, cmd: Command) -> (GateResult, Outbox) {
        let mut outbox = Outbox::new();
        let result = command_gate::validate(&cmd, self.state.last_known_pos, self.state.leaf, &self.params);
        if result != GateResult::Accepted {
            return (result, outbox);
        }
        match cmd {
            Command::Move { target, ramp, timeout_ms, overshoot_mode, overshoot_proportion } => {
                let (ramp, timeout_ms, overshoot_mode) = if target == FluidicPosition::Home {
                    (SPEED_HIGH_DEFAULT, MOVE_HOME_TIMEOUT_MS, OvershootMode::None)
                } else {
                    (ramp, timeout_ms, overshoot_mode)
                };
                self.start_move(target, ramp, timeout_ms, overshoot_mode, overshoot_proportion, &mut outbox);
            }
            Command::LiftBladders { ramp, timeout_ms } => self.start_lift_bladders(ramp, timeout_ms, &mut outbox),
            Command::Mix { target, frequency_hz, timeout_ms, cycles, mix_type, open_loop_comp, downstroke_proportion } => {
                self.start_mix(target, frequency_hz, timeout_ms, cycles, mix_type, open_loop_comp, downstroke_proportion, &mut outbox);
            }
            Command::WaitForFluidAt { target, timeout_ms } => self.start_wait_for_contact(target, timeout_ms, &mut outbox),
            Command::Stop => self.handle_stop(&mut outbox),
            Command::ClearError => {
                if self.state.leaf == LeafState::Err {
                    self.state.error_count = 0;
                    self.enter_idle(&mut outbox);
                }
            }
            Command::SetParams(new_params) => self.params = new_params,
        }
        (GateResult::Accepted, outbox)
    }

    fn handle_stop(&mut self, outbox: &mut Outbox) {
        if self.state.leaf == LeafState::Idle {
            return; // already idle: no-op
        }
        let was_moving = self.state.target_pos != FluidicPosition::None;
        if was_moving {
            self.publish_move_complete(outbox);
        }
        self.enter_idle(outbox);
    }

    fn start_move(
        &mut self,
        target: FluidicPosition,
        ramp: f32,
        timeout_ms: u32,
        overshoot_mode: OvershootMode,
        overshoot_proportion: f32,
        outbox: &mut Outbox,
    ) {
        self.state.target_pos = target;
        self.state.cmd_timeout_ticks = ticks_from_ms(timeout_ms);
        self.state.ticks = 0;
        self.state.direction =
            if self.params.volts(target) >= self.params.volts(self.state.last_known_pos) { Direction::Forward } else { Direction::Reverse };
        self.state.pending_move =
            Some(PendingMove { ramp, overshoot_mode, overshoot_proportion, publish_completion: self.state.publish_completion });
        if target.is_mix_eligible_target() {
            self.state.leaf = LeafState::CheckForStrip;
            let _ = outbox.push(Action::StartTimer);
            let _ = outbox.push(Action::EnableEchemFillDetect { min_contact: FluidPosition::PositionA });
        } else {
            self.enter_move_other(outbox);
        }
    }

    fn enter_move_other(&mut self, outbox: &mut Outbox) {
        self.state.leaf = LeafState::MoveOther;
        self.state.ticks = 0;
        self.state.target_reached_latch = false;
        self.state.bladder_detect_requested = false;
        let _ = outbox.push(Action::StartTimer);
        if self.state.target_pos == FluidicPosition::Home {
            let _ = outbox.push(Action::HomePiezo);
        } else {
            let _ = outbox.push(Action::DisableEchem);
            let ramp = self.state.pending_move.map(|m| m.ramp).unwrap_or(SPEED_HIGH_DEFAULT);
            let _ = outbox.push(Action::StartPiezoMove { target_volts: PIEZO_MIN_VOLTAGE, ramp_speed: ramp, publish_completion: true });
        }
    }

    fn start_lift_bladders(&mut self, ramp: f32, timeout_ms: u32, outbox: &mut Outbox) {
        self.state.target_pos = FluidicPosition::Home;
        self.state.cmd_timeout_ticks = ticks_from_ms(timeout_ms);
        self.state.ticks = 0;
        self.state.direction = Direction::Forward;
        self.state.target_reached_latch = false;
        self.state.bladder_detect_requested = false;
        self.state.pending_move = Some(PendingMove { ramp, overshoot_mode: OvershootMode::None, overshoot_proportion: 0.0, publish_completion: true });
        self.state.leaf = LeafState::LiftUpBladder;
        let _ = outbox.push(Action::StartTimer);
        let target_volts = (self.params.volts(FluidicPosition::Home) + self.params.limits(FluidicPosition::Home).map(|l| l.hysteresis).unwrap_or(0.0))
            .min(PIEZO_RAMP_MAX_VOLTAGE);
        let _ = outbox.push(Action::StartPiezoMove { target_volts, ramp_speed: ramp, publish_completion: false });
    }

    fn start_wait_for_contact(&mut self, target: FluidicPosition, timeout_ms: u32, outbox: &mut Outbox) {
        self.state.target_pos = target;
        self.state.cmd_timeout_ticks = ticks_from_ms(timeout_ms);
        self.state.ticks = 0;
        self.state.leaf = LeafState::WaitForContact;
        let _ = outbox.push(Action::StartTimer);
        let _ = outbox.push(Action::EnableEchemFillDetect { min_contact: FluidPosition::PositionA });
    }

    fn start_mix(
        &mut self,
        target: FluidicPosition,
        frequency_hz: f32,
        timeout_ms: u32,
        cycles: u32,
        mix_type: MixType,
        open_loop_comp: f32,
        downstroke_proportion: f32,
        outbox: &mut Outbox,
    ) {
        self.params.mix_frequency_hz = frequency_hz;
        self.params.mix_type = mix_type;
        self.params.open_loop_compensation_factor = open_loop_comp;
        self.params.mix_downstroke_proportion = downstroke_proportion;
        self.state.target_pos = target;
        self.state.direction = Direction::Reverse; // first stroke always moves toward the lower target
        self.state.pending_mix = Some(PendingMix {
            mix_type,
            frequency_hz,
            timeout_ticks: ticks_from_ms(timeout_ms),
            target_cycles: cycles,
            open_loop_comp,
            downstroke_proportion,
            target,
            rest: self.state.last_known_pos,
            first_reverse_stroke_done: false,
        });
        self.status.mix_stages_completed = 0;
        self.status.mix_complete = false;
        self.state.ticks = 0;
        self.enter_mix_stroke(outbox);
    }

    fn mix_leaf(&self) -> LeafState {
        match self.state.pending_mix.map(|m| m.mix_type) {
            Some(MixType::OpenLoop) => LeafState::MixPiezoControlled,
            Some(MixType::SinglePointClosedLoop) if self.state.direction == Direction::Reverse => LeafState::MixPiezoControlled,
            _ => LeafState::MixContactControlled,
        }
    }

    fn enter_mix_stroke(&mut self, outbox: &mut Outbox) {
        self.state.leaf = self.mix_leaf();
        let _ = outbox.push(Action::StartTimer);
        let _ = outbox.push(Action::StartMixTimer);
        let mix = match self.state.pending_mix {
            Some(m) => m,
            None => return,
        };
        let current = if self.state.direction == Direction::Reverse { self.state.last_known_pos } else { mix.target };
        let stroke = match mix.mix_type {
            MixType::DualPointClosedLoop => {
                let other = if self.state.direction == Direction::Reverse { mix.target } else { mix.rest };
                mix::closed_loop_stroke(&self.params, current, other, self.state.direction)
            }
            MixType::SinglePointClosedLoop if self.state.direction == Direction::Forward => {
                mix::closed_loop_stroke(&self.params, current, mix.rest, Direction::Forward)
            }
            MixType::SinglePointClosedLoop => {
                mix::open_loop_reverse_stroke(&self.params, self.params.volts(current), mix.target, !mix.first_reverse_stroke_done)
            }
            MixType::OpenLoop => {
                if self.state.direction == Direction::Reverse {
                    mix::open_loop_reverse_stroke(&self.params, self.params.volts(self.state.last_known_pos), mix.target, !mix.first_reverse_stroke_done)
                } else {
                    mix::open_loop_forward_stroke(&self.params, self.params.volts(mix.target), mix.rest)
                }
            }
        };
        let _ = outbox.push(Action::StartPiezoMove { target_volts: stroke.end_volts, ramp_speed: stroke.ramp, publish_completion: false });
        if matches!(self.state.leaf, LeafState::MixContactControlled) {
            let min_contact = echem::required_reading(&self.params, mix.target, self.state.direction, true);
            let _ = outbox.push(Action::EnableEchemFillDetect { min_contact });
        }
    }

    fn complete_mix_stage(&mut self, echem_matched: bool, outbox: &mut Outbox) {
        let _ = outbox.push(Action::StopPiezo);
        self.status.mix_stages_completed += 1;
        if let Some(target) = self.state.pending_mix.map(|m| m.target) {
            if let Some(limits) = self.params.limits_mut(target) {
                limits.hysteresis = mix::adapt_hysteresis(limits.hysteresis, echem_matched, self.params.hysteresis_increase, self.params.hysteresis_decrease);
            }
        }
        if let Some(mix) = self.state.pending_mix.as_mut() {
            if self.state.direction == Direction::Reverse {
                mix.first_reverse_stroke_done = true;
            }
        }
        let cycles_done = mix::cycles_complete(
            self.status.mix_stages_completed,
            self.state.pending_mix.map(|m| m.target_cycles).unwrap_or(0),
        );
        if cycles_done {
            self.finish_mix(outbox);
        } else {
            self.state.leaf = LeafState::MixWaitContinue;
            let _ = outbox.push(Action::Publish(FccEvent::MixStageComplete { channel: self.params.channel }));
        }
    }

    /// Both a completed mix and a timed-out mix return to the configured
    /// rest position through a normal contact move rather than snapping
    /// `last_known_pos` there directly: the piezo isn't reliably sitting
    /// at `rest` voltage already, since a timeout can land it mid-stroke.
    fn start_return_to_rest(&mut self, rest: FluidicPosition, outbox: &mut Outbox) {
        self.state.mix_return = true;
        self.state.target_pos = rest;
        self.state.direction = Direction::Forward; // rest is the higher of the two mix endpoints
        self.state.cmd_timeout_ticks = ticks_from_ms(self.params.move_timeout_ms);
        self.state.ticks = 0;
        self.state.pending_move = Some(PendingMove {
            ramp: self.params.ramp_speed / RETURN_SPEED_REDUCTION_FACTOR,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
            publish_completion: true,
        });
        self.enter_move_contact(outbox);
    }

    fn finish_mix(&mut self, outbox: &mut Outbox) {
        self.status.mix_complete = true;
        let rest = self.state.pending_mix.map(|m| m.rest).unwrap_or(self.state.last_known_pos);
        self.state.pending_mix = None;
        self.start_return_to_rest(rest, outbox);
    }

    fn abort_mix_on_timeout(&mut self, outbox: &mut Outbox) {
        let rest = self.state.pending_mix.map(|m| m.rest).unwrap_or(self.state.last_known_pos);
        self.state.pending_mix = None;
        let _ = outbox.push(Action::Publish(FccEvent::CommandFailed { error: FccError::MoveLocal(MoveLocalError::MixTimeout) }));
        self.start_return_to_rest(rest, outbox);
    }

    // ---- event dispatch -----------------------------------------------

    pub fn dispatch(&mut self, event: ControllerEvent) -> Outbox {
        let mut outbox = Outbox::new();
        match event {
            ControllerEvent::GlobalHalt => {
                if self.state.leaf != LeafState::Idle {
                    self.handle_stop(&mut outbox);
                }
            }
            ControllerEvent::DoorOpened => {
                // Silently home the channel, suppressing MoveComplete.
                self.state.publish_completion = false;
                let _ = self.handle_command(Command::Move {
                    target: FluidicPosition::Home,
                    ramp: SPEED_HIGH_DEFAULT,
                    timeout_ms: MOVE_HOME_TIMEOUT_MS,
                    overshoot_mode: OvershootMode::None,
                    overshoot_proportion: 0.0,
                });
            }
            ControllerEvent::Tick => self.on_tick(&mut outbox),
            ControllerEvent::PiezoMoveComplete { channel, voltage } => {
                if self.for_own_channel(channel) {
                    self.on_piezo_move_complete(voltage, &mut outbox);
                }
            }
            ControllerEvent::PiezoStopped { channel, voltage } => {
                if self.for_own_channel(channel) {
                    self.on_piezo_stopped(voltage, &mut outbox);
                }
            }
            ControllerEvent::PiezoMoveFail { channel } => {
                if self.for_own_channel(channel) {
                    self.fail(FccError::Critical(CriticalError::PiezoUnknown), None, &mut outbox);
                }
            }
            ControllerEvent::EchemStatusChanged { per_channel_positions } => {
                let idx = (self.params.channel as usize).saturating_sub(1);
                if let Some(reading) = per_channel_positions.get(idx).copied() {
                    self.status.last_fluid_front = reading;
                    self.on_echem_status_changed(reading, &mut outbox);
                }
            }
            ControllerEvent::EchemError { channel } => {
                if self.for_own_channel(channel) {
                    self.fail(FccError::Critical(CriticalError::EchemBusy), None, &mut outbox);
                }
            }
            ControllerEvent::BladderUp { bladder } => {
                if self.own_bladder() == Some(bladder) && self.state.leaf == LeafState::LiftUpBladder && self.state.bladder_detect_requested {
                    self.state.target_reached_latch = true;
                    let _ = outbox.push(Action::Publish(FccEvent::StopBladderDetect { channel: self.params.channel }));
                    let _ = outbox.push(Action::StopPiezo);
                }
            }
            ControllerEvent::BladderDown { bladder } => {
                if self.own_bladder() == Some(bladder)
                    && self.state.leaf == LeafState::MoveOther
                    && self.state.target_pos == FluidicPosition::Down
                    && self.state.bladder_detect_requested
                {
                    self.state.target_reached_latch = true;
                    let _ = outbox.push(Action::Publish(FccEvent::StopBladderDetect { channel: self.params.channel }));
                    let _ = outbox.push(Action::StopPiezo);
                }
            }
            ControllerEvent::MixContinue => {
                if self.state.leaf == LeafState::MixWaitContinue {
                    self.state.direction = self.state.direction.invert();
                    self.enter_mix_stroke(&mut outbox);
                }
            }
        }
        outbox
    }

    fn on_tick(&mut self, outbox: &mut Outbox) {
        self.state.ticks += 1;
        match self.state.leaf {
            LeafState::CheckForStrip => {
                if self.state.ticks >= ticks_from_ms(ECHEM_UPDATE_PERIOD_MS) {
                    match self.status.last_fluid_front {
                        FluidPosition::NoStrip => self.fail(
                            FccError::MoveLocal(MoveLocalError::NoStrip),
                            Some(FccEvent::MoveFail { channel: self.params.channel, target_position: self.state.target_pos }),
                            outbox,
                        ),
                        FluidPosition::Invalid => {} // keep waiting
                        _ => self.enter_move_contact(outbox),
                    }
                }
                if self.state.leaf == LeafState::CheckForStrip && self.state.ticks >= self.state.cmd_timeout_ticks {
                    self.fail(
                        FccError::MoveLocal(MoveLocalError::CommandTimeout),
                        Some(FccEvent::MoveFail { channel: self.params.channel, target_position: self.state.target_pos }),
                        outbox,
                    );
                }
            }
            LeafState::MoveContact | LeafState::MoveOther | LeafState::LiftUpBladder | LeafState::WaitForContact => {
                let awaits_bladder = (self.state.leaf == LeafState::LiftUpBladder)
                    || (self.state.leaf == LeafState::MoveOther && self.state.target_pos == FluidicPosition::Down);
                if awaits_bladder
                    && !self.state.bladder_detect_requested
                    && self.state.ticks >= ticks_from_ms(BLADDER_DETECT_DELAY_MS)
                {
                    self.state.bladder_detect_requested = true;
                    let _ = outbox.push(Action::Publish(FccEvent::StartBladderDetect { channel: self.params.channel }));
                }
                if self.state.ticks >= self.state.cmd_timeout_ticks {
                    if awaits_bladder && self.state.bladder_detect_requested {
                        let _ = outbox.push(Action::Publish(FccEvent::StopBladderDetect { channel: self.params.channel }));
                    }
                    let error = if self.state.leaf == LeafState::WaitForContact {
                        MoveLocalError::CommandTimeout
                    } else {
                        MoveLocalError::MoveTimeout
                    };
                    self.fail(
                        FccError::MoveLocal(error),
                        Some(FccEvent::MoveFail { channel: self.params.channel, target_position: self.state.target_pos }),
                        outbox,
                    );
                }
            }
            LeafState::MixContactControlled | LeafState::MixPiezoControlled | LeafState::MixWaitContinue => {
                if let Some(mix) = self.state.pending_mix {
                    if self.state.ticks >= mix.timeout_ticks {
                        self.abort_mix_on_timeout(outbox);
                    }
                }
            }
            _ => {}
        }
    }

    fn enter_move_contact(&mut self, outbox: &mut Outbox) {
        self.state.leaf = LeafState::MoveContact;
        self.state.ticks = 0;
        let _ = outbox.push(Action::StartTimer);
        let _ = outbox.push(Action::EnableEchemFillDetect {
            min_contact: echem::required_reading(&self.params, self.state.target_pos, self.state.direction, true),
        });
        let pending = self.state.pending_move.unwrap_or(PendingMove {
            ramp: self.params.ramp_speed,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
            publish_completion: true,
        });
        let target_volts = piezo_move::move_target_volts(&self.params, self.state.target_pos, self.state.direction);
        let _ = outbox.push(Action::StartPiezoMove { target_volts, ramp_speed: pending.ramp, publish_completion: false });
    }

    fn on_echem_status_changed(&mut self, reading: FluidPosition, outbox: &mut Outbox) {
        match self.state.leaf {
            LeafState::MoveContact => {
                let required = echem::required_reading(&self.params, self.state.target_pos, self.state.direction, true);
                if reading >= required {
                    let _ = outbox.push(Action::StopPiezo);
                    self.state.leaf = LeafState::WaitForPiezoStop;
                }
            }
            LeafState::WaitForContact => {
                if reading == echem::required_reading(&self.params, self.state.target_pos, Direction::Forward, false) {
                    self.state.last_known_pos = self.state.target_pos;
                    self.publish_move_complete(outbox);
                    self.enter_idle(outbox);
                }
            }
            LeafState::MixContactControlled => {
                if let Some(mix) = self.state.pending_mix {
                    let required = echem::required_reading(&self.params, mix.target, self.state.direction, true);
                    if reading >= required {
                        self.complete_mix_stage(true, outbox);
                    }
                }
            }
            LeafState::MonitorFluidBreach => {
                if breach::is_breach(&self.params, self.state.last_known_pos, reading) {
                    let target = self.state.last_known_pos;
                    self.fail(
                        FccError::Critical(CriticalError::FluidFrontBreach),
                        Some(FccEvent::BreachDetected { channel: self.params.channel }),
                        outbox,
                    );
                    let _ = outbox.push(Action::Publish(FccEvent::MoveFail { channel: self.params.channel, target_position: target }));
                }
            }
            _ => {}
        }
    }

    fn on_piezo_move_complete(&mut self, voltage: f32, outbox: &mut Outbox) {
        self.status.last_piezo_voltage = voltage;
        match self.state.leaf {
            LeafState::MoveOther if self.state.target_pos == FluidicPosition::Home => {
                self.state.last_known_pos = FluidicPosition::Home;
                self.params.reset_abc_on_home();
                self.publish_move_complete(outbox);
                self.enter_idle(outbox);
            }
            LeafState::MixPiezoControlled => {
                if let Some(mix) = self.state.pending_mix {
                    let _ = mix;
                }
                self.complete_mix_stage(false, outbox);
            }
            _ => {}
        }
    }

    fn on_piezo_stopped(&mut self, voltage: f32, outbox: &mut Outbox) {
        self.status.last_piezo_voltage = voltage;
        match self.state.leaf {
            LeafState::WaitForPiezoStop => {
                if let Some(limits) = self.params.limits_mut(self.state.target_pos) {
                    limits.target_volts = voltage;
                }
                let (overshoot_mode, overshoot_proportion) = self
                    .state
                    .pending_move
                    .map(|m| (m.overshoot_mode, m.overshoot_proportion))
                    .unwrap_or((OvershootMode::None, 0.0));
                match piezo_move::apply_overshoot(&self.params, self.state.target_pos, self.state.direction, overshoot_mode, overshoot_proportion) {
                    piezo_move::OvershootOutcome::PublishSuccess => self.finish_move(outbox),
                    piezo_move::OvershootOutcome::SecondaryMove { target_volts } => {
                        if let Some(limits) = self.params.limits_mut(self.state.target_pos) {
                            limits.target_volts = target_volts;
                        }
                        let _ = outbox.push(Action::StartPiezoMove { target_volts, ramp_speed: PIEZO_RAMP_MAX, publish_completion: false });
                    }
                    piezo_move::OvershootOutcome::ReenterReverse => {
                        self.state.direction = Direction::Reverse;
                        self.state.leaf = LeafState::MoveContact;
                        self.state.ticks = 0;
                        let target_volts = piezo_move::move_target_volts(&self.params, self.state.target_pos, Direction::Reverse);
                        let _ = outbox.push(Action::StartPiezoMove { target_volts, ramp_speed: PIEZO_RAMP_MAX, publish_completion: false });
                    }
                }
            }
            LeafState::LiftUpBladder if self.state.target_reached_latch => {
                self.state.last_known_pos = FluidicPosition::Down;
                if let Some(limits) = self.params.limits_mut(FluidicPosition::Down) {
                    limits.target_volts = voltage;
                }
                self.publish_move_complete(outbox);
                self.enter_idle(outbox);
            }
            LeafState::MoveOther if self.state.target_reached_latch && self.state.target_pos == FluidicPosition::Down => {
                self.state.last_known_pos = FluidicPosition::Down;
                if let Some(limits) = self.params.limits_mut(FluidicPosition::Down) {
                    limits.target_volts = voltage;
                }
                self.publish_move_complete(outbox);
                self.enter_idle(outbox);
            }
            _ => {
                // An unexpected stop, e.g. during WaitForContact, is the
                // one state that never treats it as success.
                if self.state.leaf == LeafState::WaitForContact {
                    self.fail(
                        FccError::MoveLocal(MoveLocalError::UnexpectedPiezoMsg),
                        Some(FccEvent::MoveFail { channel: self.params.channel, target_position: self.state.target_pos }),
                        outbox,
                    );
                }
            }
        }
    }

    fn finish_move(&mut self, outbox: &mut Outbox) {
        self.state.last_known_pos = self.state.target_pos;
        self.state.error_count = 0;
        if self.state.mix_return {
            self.state.mix_return = false;
            let _ = outbox.push(Action::Publish(FccEvent::MixComplete {
                channel: self.params.channel,
                rest_position: self.state.last_known_pos,
            }));
            self.enter_idle(outbox);
            return;
        }
        if self.params.monitor_breach_after_move {
            self.state.leaf = LeafState::MonitorFluidBreach;
            let min_contact = echem::required_reading(&self.params, self.state.last_known_pos, Direction::Forward, false);
            let _ = outbox.push(Action::EnableEchemFillDetect { min_contact });
            self.publish_move_complete(outbox);
        } else {
            self.publish_move_complete(outbox);
            self.enter_idle(outbox);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_params;

    fn controller_at(pos: FluidicPosition) -> Controller {
        let mut c = Controller::new(default_params(1));
        c.state.last_known_pos = pos;
        c
    }

    #[test]
    fn happy_path_move_to_a() {
        let mut c = controller_at(FluidicPosition::Down);
        let (result, _) = c.handle_command(Command::Move {
            target: FluidicPosition::A,
            ramp: 2.5,
            timeout_ms: 30_000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        });
        assert_eq!(result, GateResult::Accepted);
        assert_eq!(c.state.leaf, LeafState::CheckForStrip);

        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::Fluid; 4] });
        assert_eq!(c.state.leaf, LeafState::MoveContact);

        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::PositionA; 4] });
        assert_eq!(c.state.leaf, LeafState::WaitForPiezoStop);

        let out = c.dispatch(ControllerEvent::PiezoStopped { channel: 1, voltage: 110.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert_eq!(c.state.last_known_pos, FluidicPosition::A);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MoveComplete { rest_position: FluidicPosition::A, .. }))));
    }

    #[test]
    fn no_strip_fails_move() {
        let mut c = controller_at(FluidicPosition::Down);
        c.handle_command(Command::Move {
            target: FluidicPosition::A,
            ramp: 2.5,
            timeout_ms: 30_000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        });
        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::NoStrip; 4] });
        let out = c.dispatch(ControllerEvent::Tick);
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MoveFail { .. }))));
    }

    #[test]
    fn repeated_move_local_failures_escalate_to_error_count_exceeded() {
        let mut c = controller_at(FluidicPosition::Down);
        for n in 1..=FLUIDIC_MAX_FAIL_COUNT {
            c.handle_command(Command::Move {
                target: FluidicPosition::A,
                ramp: 2.5,
                timeout_ms: 30_000,
                overshoot_mode: OvershootMode::None,
                overshoot_proportion: 0.0,
            });
            let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::NoStrip; 4] });
            let out = c.dispatch(ControllerEvent::Tick);
            if n < FLUIDIC_MAX_FAIL_COUNT {
                assert_eq!(c.state.leaf, LeafState::Idle);
                assert!(out.iter().any(|a| matches!(
                    a,
                    Action::Publish(FccEvent::CommandFailed { error: FccError::MoveLocal(MoveLocalError::NoStrip) })
                )));
            } else {
                assert_eq!(c.state.leaf, LeafState::Err);
                assert!(out.iter().any(|a| matches!(
                    a,
                    Action::Publish(FccEvent::CommandFailed { error: FccError::Critical(CriticalError::ErrorCountExceeded) })
                )));
            }
        }
    }

    #[test]
    fn successful_move_resets_the_failure_counter() {
        let mut c = controller_at(FluidicPosition::Down);
        c.handle_command(Command::Move {
            target: FluidicPosition::A,
            ramp: 2.5,
            timeout_ms: 30_000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        });
        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::NoStrip; 4] });
        let _ = c.dispatch(ControllerEvent::Tick);
        assert_eq!(c.state.error_count, 1);

        c.handle_command(Command::Move {
            target: FluidicPosition::A,
            ramp: 2.5,
            timeout_ms: 30_000,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        });
        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::Fluid; 4] });
        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::PositionA; 4] });
        let _ = c.dispatch(ControllerEvent::PiezoStopped { channel: 1, voltage: 110.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert_eq!(c.state.error_count, 0);
    }

    #[test]
    fn move_times_out_without_invalidating_position() {
        let mut c = controller_at(FluidicPosition::A);
        c.handle_command(Command::Move {
            target: FluidicPosition::B,
            ramp: 2.5,
            timeout_ms: 200,
            overshoot_mode: OvershootMode::None,
            overshoot_proportion: 0.0,
        });
        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::Fluid; 4] });
        assert_eq!(c.state.leaf, LeafState::MoveContact);
        for _ in 0..(200 / FLUIDIC_TIMER_COUNT_MS + 1) {
            c.dispatch(ControllerEvent::Tick);
        }
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert_eq!(c.state.last_known_pos, FluidicPosition::A);
    }

    #[test]
    fn breach_after_move_forces_err() {
        let mut c = controller_at(FluidicPosition::B);
        c.params.monitor_breach_after_move = true;
        c.state.leaf = LeafState::MonitorFluidBreach;
        let out = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::Fluid; 4] });
        assert_eq!(c.state.leaf, LeafState::Err);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::BreachDetected { .. }))));
    }

    #[test]
    fn lift_bladders_completes_on_bladder_up_then_piezo_stop() {
        let mut c = controller_at(FluidicPosition::Unknown);
        c.handle_command(Command::LiftBladders { ramp: 2.5, timeout_ms: 10_000 });
        assert_eq!(c.state.leaf, LeafState::LiftUpBladder);
        let tick_out = c.dispatch(ControllerEvent::Tick);
        assert!(tick_out.iter().any(|a| matches!(a, Action::Publish(FccEvent::StartBladderDetect { .. }))));
        let _ = c.dispatch(ControllerEvent::BladderUp { bladder: BladderChannel::A1 });
        assert!(c.state.target_reached_latch);
        let out = c.dispatch(ControllerEvent::PiezoStopped { channel: 1, voltage: 5.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert_eq!(c.state.last_known_pos, FluidicPosition::Down);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MoveComplete { rest_position: FluidicPosition::Down, .. }))));
    }

    #[test]
    fn clear_error_returns_to_idle() {
        let mut c = controller_at(FluidicPosition::A);
        c.enter_err(FccError::Critical(CriticalError::PiezoUnknown), &mut Outbox::new());
        assert_eq!(c.state.leaf, LeafState::Err);
        let (result, _) = c.handle_command(Command::ClearError);
        assert_eq!(result, GateResult::Accepted);
        assert_eq!(c.state.leaf, LeafState::Idle);
    }

    #[test]
    fn door_opened_suppresses_move_complete() {
        let mut c = controller_at(FluidicPosition::A);
        let _ = c.dispatch(ControllerEvent::DoorOpened);
        assert_eq!(c.state.leaf, LeafState::MoveOther);
        let out = c.dispatch(ControllerEvent::PiezoMoveComplete { channel: 1, voltage: 200.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert!(!out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MoveComplete { .. }))));
    }

    #[test]
    fn stop_in_idle_is_a_no_op() {
        let mut c = controller_at(FluidicPosition::A);
        let (result, out) = c.handle_command(Command::Stop);
        assert_eq!(result, GateResult::Accepted);
        assert!(out.is_empty());
        assert_eq!(c.state.leaf, LeafState::Idle);
    }

    #[test]
    fn wait_for_contact_never_treats_piezo_stop_as_success() {
        let mut c = controller_at(FluidicPosition::A);
        c.handle_command(Command::WaitForFluidAt { target: FluidicPosition::B, timeout_ms: 5_000 });
        assert_eq!(c.state.leaf, LeafState::WaitForContact);
        let out = c.dispatch(ControllerEvent::PiezoStopped { channel: 1, voltage: 50.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::CommandFailed { error: FccError::MoveLocal(MoveLocalError::UnexpectedPiezoMsg) }))));
    }

    #[test]
    fn mix_complete_returns_to_rest_before_publishing_mix_complete() {
        let mut c = controller_at(FluidicPosition::B);
        let (result, out) = c.handle_command(Command::Mix {
            target: FluidicPosition::A,
            frequency_hz: 1.0,
            timeout_ms: 30_000,
            cycles: 1,
            mix_type: MixType::DualPointClosedLoop,
            open_loop_comp: 0.0,
            downstroke_proportion: 0.5,
        });
        assert_eq!(result, GateResult::Accepted);
        assert!(!out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MixComplete { .. }))));

        let mut first = Outbox::new();
        c.complete_mix_stage(true, &mut first);
        assert_eq!(c.state.leaf, LeafState::MixWaitContinue);
        assert!(c.state.pending_mix.is_some());

        let mut second = Outbox::new();
        c.complete_mix_stage(true, &mut second);
        // cycles_complete() trips on the 2nd stage of a 1-cycle mix: the
        // controller should now be driving a return move, not idle yet,
        // and must not have published MixComplete prematurely.
        assert_eq!(c.state.leaf, LeafState::MoveContact);
        assert!(c.state.mix_return);
        assert!(c.state.pending_mix.is_none());
        assert!(!second.iter().any(|a| matches!(a, Action::Publish(FccEvent::MixComplete { .. }))));

        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::PositionB; 4] });
        assert_eq!(c.state.leaf, LeafState::WaitForPiezoStop);

        let out = c.dispatch(ControllerEvent::PiezoStopped { channel: 1, voltage: 90.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert!(!c.state.mix_return);
        assert_eq!(c.state.last_known_pos, FluidicPosition::B);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MixComplete { rest_position: FluidicPosition::B, .. }))));
    }

    #[test]
    fn mix_timeout_aborts_and_still_returns_to_rest() {
        let mut c = controller_at(FluidicPosition::B);
        let (result, _) = c.handle_command(Command::Mix {
            target: FluidicPosition::A,
            frequency_hz: 1.0,
            timeout_ms: 200,
            cycles: 5,
            mix_type: MixType::DualPointClosedLoop,
            open_loop_comp: 0.0,
            downstroke_proportion: 0.5,
        });
        assert_eq!(result, GateResult::Accepted);

        let mut last_out = Outbox::new();
        for _ in 0..(200 / FLUIDIC_TIMER_COUNT_MS + 1) {
            last_out = c.dispatch(ControllerEvent::Tick);
        }
        assert!(last_out.iter().any(|a| matches!(
            a,
            Action::Publish(FccEvent::CommandFailed { error: FccError::MoveLocal(MoveLocalError::MixTimeout) })
        )));
        assert_eq!(c.state.leaf, LeafState::MoveContact);
        assert!(c.state.mix_return);
        assert!(c.state.pending_mix.is_none());

        let _ = c.dispatch(ControllerEvent::EchemStatusChanged { per_channel_positions: [FluidPosition::PositionB; 4] });
        assert_eq!(c.state.leaf, LeafState::WaitForPiezoStop);

        let out = c.dispatch(ControllerEvent::PiezoStopped { channel: 1, voltage: 90.0 });
        assert_eq!(c.state.leaf, LeafState::Idle);
        assert!(out.iter().any(|a| matches!(a, Action::Publish(FccEvent::MixComplete { rest_position: FluidicPosition::B, .. }))));
    }

    #[test]
    fn single_point_closed_loop_reverse_stroke_is_piezo_controlled() {
        let mut c = controller_at(FluidicPosition::B);
        let (result, out) = c.handle_command(Command::Mix {
            target: FluidicPosition::A,
            frequency_hz: 1.0,
            timeout_ms: 30_000,
            cycles: 1,
            mix_type: MixType::SinglePointClosedLoop,
            open_loop_comp: 0.1,
            downstroke_proportion: 0.5,
        });
        assert_eq!(result, GateResult::Accepted);
        // first stroke always moves downward (Reverse) first: single-point
        // reverse strokes are piezo controlled, not echem-bounded.
        assert_eq!(c.state.leaf, LeafState::MixPiezoControlled);
        assert!(!out.iter().any(|a| matches!(a, Action::EnableEchemFillDetect { .. })));

        let mut first = Outbox::new();
        c.complete_mix_stage(false, &mut first);
        assert_eq!(c.state.leaf, LeafState::MixWaitContinue);

        let second = c.dispatch(ControllerEvent::MixContinue);
        // the following forward stroke (back toward rest) is contact
        // controlled and does enable echem fill detection.
        assert_eq!(c.state.leaf, LeafState::MixContactControlled);
        assert!(second.iter().any(|a| matches!(a, Action::EnableEchemFillDetect { .. })));
    }
}
