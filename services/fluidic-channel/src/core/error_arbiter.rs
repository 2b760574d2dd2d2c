//! Error arbiter: classification is already done by the caller (each
//! handler produces an `FccError`); this module only decides whether a
//! given error forces `Err`, and suppresses further critical errors once
//! a transition to `Err` is already underway.

use super::error::FccError;

/// `true` if `error` should force a transition to the `Err` leaf state.
/// `already_entering_err` prevents a second critical error arriving in
/// the same dispatch from re-triggering entry.
pub fn forces_err(error: FccError, already_entering_err: bool) -> bool {
    error.is_critical() && !already_entering_err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{CriticalError, MoveLocalError};

    #[test]
    fn critical_error_forces_err() {
        assert!(forces_err(FccError::Critical(CriticalError::PiezoUnknown), false));
    }

    #[test]
    fn already_entering_err_swallows_further_critical_errors() {
        assert!(!forces_err(FccError::Critical(CriticalError::EchemBusy), true));
    }

    #[test]
    fn move_local_error_never_forces_err() {
        assert!(!forces_err(FccError::MoveLocal(MoveLocalError::NoStrip), false));
    }
}
