//! Tunables shared by every channel. Values are chosen to be plausible
//! for a piezo bender driving a ~200V-class stack; the exact calibration
//! curve is owned by the piezo driver, not by this crate.

/// Timer cadence shared by every channel's state machine.
pub const FLUIDIC_TIMER_COUNT_MS: u32 = 20;

/// Minimum dwell in `CheckForStrip` before an echem reading is trusted.
pub const ECHEM_UPDATE_PERIOD_MS: u32 = 20;

/// Delay after entering `MoveOther`/`LiftUpBladder` before bladder
/// detection is requested.
pub const BLADDER_DETECT_DELAY_MS: u32 = 20;

/// Ceiling on piezo ramp speed (V/s).
pub const PIEZO_RAMP_MAX: f32 = 40.0;

/// Floor of the piezo voltage range (fully pressed / `Down`).
pub const PIEZO_MIN_VOLTAGE: f32 = 0.0;

/// Ceiling of the piezo voltage range (fully lifted / `Home`).
pub const PIEZO_RAMP_MAX_VOLTAGE: f32 = 200.0;

/// Alias used by the homing path: A/B/C are reset to this value whenever
/// the channel homes.
pub const FLUIDIC_MAX_VOLTS_BEFORE_LIFT: f32 = PIEZO_RAMP_MAX_VOLTAGE;

/// Ramp used internally by `Move(Home)` regardless of caller input.
pub const SPEED_HIGH_DEFAULT: f32 = 25.0;

/// Timeout used internally by `Move(Home)` regardless of caller input.
pub const MOVE_HOME_TIMEOUT_MS: u32 = 1_000;

/// Hysteresis clamp range.
pub const HYST_MIN: f32 = 1.0;
pub const HYST_MAX: f32 = 10.0;

/// Consecutive move-local failures (without an intervening success) that
/// escalate to `CriticalError::ErrorCountExceeded`.
pub const FLUIDIC_MAX_FAIL_COUNT: u32 = 2;

/// Reduction applied to the post-mix return-to-rest move's ramp speed
/// relative to a normal move: nothing is waiting on this move, and a
/// gentler stroke resettles at the rest contact with less overshoot.
pub const RETURN_SPEED_REDUCTION_FACTOR: f32 = 2.0;
