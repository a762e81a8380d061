//! Authoritative state resynchronization.
//!
//! Joint state is owned here and overwritten wholesale on every refresh.
//! A joint starts not-ready and must render disabled until its first info
//! reply arrives; there is no blocking initialization.

#![allow(missing_docs)]

use indexmap::IndexMap;
use tracing::warn;

use crate::error::ArmError;
use crate::event::Outbound;
use crate::joint::{JointId, JointSnapshot};

/// Pulls authoritative joint state from the service and hands it to the
/// binding. Every other component triggers a refresh here after any
/// state-changing event, except successful motion writes, which trust the
/// optimistic local value.
#[derive(Debug)]
pub struct StateSync {
    joints: IndexMap<JointId, Option<JointSnapshot>>,
}

impl StateSync {
    /// All joints present, none ready.
    #[must_use]
    pub fn new() -> Self {
        Self {
            joints: JointId::ALL.iter().map(|&joint| (joint, None)).collect(),
        }
    }

    /// Requests refreshing every joint.
    #[must_use]
    pub fn refresh_all(&self) -> Vec<Outbound> {
        JointId::ALL
            .iter()
            .map(|&joint| Outbound::FetchInfo { joint })
            .collect()
    }

    /// Request refreshing one joint.
    #[must_use]
    pub fn refresh(&self, joint: JointId) -> Outbound {
        Outbound::FetchInfo { joint }
    }

    /// Apply an info completion. A success overwrites the snapshot wholesale
    /// and marks the joint ready; a failure keeps whatever was known.
    pub fn apply(&mut self, joint: JointId, result: Result<JointSnapshot, ArmError>) {
        match result {
            Ok(snapshot) => {
                self.joints.insert(joint, Some(snapshot));
            }
            Err(err) => {
                warn!(%joint, %err, "joint info fetch failed");
            }
        }
    }

    /// Authoritative snapshot, if the joint has ever been fetched.
    #[must_use]
    pub fn snapshot(&self, joint: JointId) -> Option<&JointSnapshot> {
        self.joints.get(&joint).and_then(Option::as_ref)
    }

    /// Whether the joint has an authoritative snapshot to act on.
    #[must_use]
    pub fn ready(&self, joint: JointId) -> bool {
        self.snapshot(joint).is_some()
    }
}

impl Default for StateSync {
    fn default() -> Self {
        Self::new()
    }
}
