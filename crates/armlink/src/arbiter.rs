//! Access token acquire/release state machine.

#![allow(missing_docs)]

use std::fmt;

use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::error::ArmError;

/// Who holds the exclusive-write token for the arm.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessToken {
    /// Nobody is known to hold it.
    #[default]
    Unheld,
    /// This client holds it; controls are editable.
    Mine,
    /// Another named client holds it.
    Other(SmolStr),
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessToken::Unheld => f.write_str("unheld"),
            AccessToken::Mine => f.write_str("mine"),
            AccessToken::Other(holder) => write!(f, "held by {holder}"),
        }
    }
}

/// Owns the token lifecycle. The token is mutated only on service replies;
/// no client-side expiry is modeled, staleness is corrected by the next
/// conflict reply or refresh.
#[derive(Debug, Default)]
pub struct AccessArbiter {
    token: AccessToken,
}

impl AccessArbiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token state.
    #[must_use]
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Editability is a pure function of the token: `Mine` and nothing else.
    #[must_use]
    pub fn is_mine(&self) -> bool {
        matches!(self.token, AccessToken::Mine)
    }

    /// Apply an acquire completion. Returns `true` when the token
    /// transitioned (the caller must then refresh all joints and recompute
    /// editability).
    pub fn on_acquire(&mut self, result: &Result<(), ArmError>) -> bool {
        match result {
            Ok(()) => {
                debug!("access token granted");
                self.token = AccessToken::Mine;
                true
            }
            Err(ArmError::ControlHeld { holder }) => {
                debug!(%holder, "access token held elsewhere");
                self.token = AccessToken::Other(holder.clone());
                true
            }
            Err(err) => {
                // Not a transition: the service never answered either way.
                warn!(%err, "token acquire failed");
                false
            }
        }
    }

    /// Apply a release completion. Local state resets to `Unheld` on success
    /// and failure alike; release failures are logged, never retried.
    pub fn on_release(&mut self, result: &Result<(), ArmError>) {
        if let Err(err) = result {
            warn!(%err, "token release failed, resetting local state anyway");
        }
        self.token = AccessToken::Unheld;
    }
}
