//! Client errors.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors surfaced by the arm service client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmError {
    /// Any network or HTTP-level failure.
    #[error("transport failure '{0}'")]
    Transport(SmolStr),

    /// Token acquire denied; the named client currently holds control.
    #[error("control is held by '{holder}'")]
    ControlHeld {
        /// Current holder, verbatim from the conflict response body.
        holder: SmolStr,
    },

    /// The service rejected a min/max bound value.
    #[error("limit rejected '{0}'")]
    LimitRejected(SmolStr),

    /// The service returned a payload the client could not decode.
    #[error("invalid response '{0}'")]
    InvalidResponse(SmolStr),

    /// Configuration error.
    #[error("invalid config '{0}'")]
    InvalidConfig(SmolStr),
}
