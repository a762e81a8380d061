//! Single-flight motion command channel.
//!
//! Drag-style input fires far faster than a network round trip. Queueing
//! every intent would build an unbounded backlog of stale positions, so the
//! channel carries at most one in-flight write and drops submissions while
//! busy. Dropped values are never replayed.

#![allow(missing_docs)]

use tracing::{debug, warn};

use crate::error::ArmError;
use crate::joint::JointId;

/// Outcome of a motion submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// The write may be issued; the channel is now pending.
    Issued,
    /// A write is already in flight; this value is dropped.
    DroppedBusy,
}

/// Per-joint outbound motion gate. `pending` never exceeds one.
#[derive(Debug)]
pub struct CommandChannel {
    joint: JointId,
    pending: bool,
}

impl CommandChannel {
    #[must_use]
    pub fn new(joint: JointId) -> Self {
        Self {
            joint,
            pending: false,
        }
    }

    /// Whether a write is in flight.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Gate a position submission. On [`Submit::Issued`] the caller must
    /// issue exactly one write and later call [`CommandChannel::complete`].
    pub fn submit(&mut self, pos: i32) -> Submit {
        if self.pending {
            debug!(joint = %self.joint, pos, "motion dropped, write in flight");
            return Submit::DroppedBusy;
        }
        self.pending = true;
        Submit::Issued
    }

    /// Apply a write completion. Failures are logged and absorbed; motion
    /// writes are best-effort and never retried.
    pub fn complete(&mut self, result: &Result<(), ArmError>) {
        if let Err(err) = result {
            warn!(joint = %self.joint, %err, "motion write failed");
        }
        self.pending = false;
    }
}
