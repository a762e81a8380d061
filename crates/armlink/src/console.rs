//! Event-thread controller wiring all components.
//!
//! `ArmConsole` is driven by exactly one thread. The host feeds it input
//! events and [`ServiceReply`] completions; it emits [`Outbound`] requests
//! for the transport and [`UiUpdate`] values for the binding. It never
//! performs I/O and never blocks.

#![allow(missing_docs)]

use std::sync::mpsc::Sender;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::arbiter::{AccessArbiter, AccessToken};
use crate::channel::{CommandChannel, Submit};
use crate::clock::Clock;
use crate::editor::{Commit, EditOutcome, LimitEditor};
use crate::event::{Outbound, ServiceReply, UiUpdate};
use crate::joint::{JointId, JointSnapshot, LimitKind};
use crate::sync::StateSync;

/// The control client core: token arbitration, single-flight motion writes,
/// bound editing and state resynchronization behind one single-threaded
/// facade.
pub struct ArmConsole {
    operator: SmolStr,
    clock: Arc<dyn Clock>,
    arbiter: AccessArbiter,
    sync: StateSync,
    channels: IndexMap<JointId, CommandChannel>,
    editor: LimitEditor,
    requests: Sender<Outbound>,
    updates: Sender<UiUpdate>,
}

impl ArmConsole {
    /// Build a console that emits requests and updates on the given
    /// channels.
    #[must_use]
    pub fn new(
        operator: SmolStr,
        clock: Arc<dyn Clock>,
        requests: Sender<Outbound>,
        updates: Sender<UiUpdate>,
    ) -> Self {
        Self {
            operator,
            clock,
            arbiter: AccessArbiter::new(),
            sync: StateSync::new(),
            channels: JointId::ALL
                .iter()
                .map(|&joint| (joint, CommandChannel::new(joint)))
                .collect(),
            editor: LimitEditor::new(),
            requests,
            updates,
        }
    }

    /// Current editability; a pure function of the token, never cached.
    #[must_use]
    pub fn editable(&self) -> bool {
        self.arbiter.is_mine()
    }

    /// Current token state.
    #[must_use]
    pub fn token(&self) -> &AccessToken {
        self.arbiter.token()
    }

    /// Authoritative snapshot for a joint, if it has been fetched.
    #[must_use]
    pub fn snapshot(&self, joint: JointId) -> Option<&JointSnapshot> {
        self.sync.snapshot(joint)
    }

    /// Initial load: emit the disabled starting state and request every
    /// joint's info. Joints stay disabled until their replies arrive.
    pub fn start(&mut self) {
        self.emit(UiUpdate::Token(self.arbiter.token().clone()));
        self.emit_editability();
        for joint in JointId::ALL {
            self.emit(UiUpdate::Joint {
                joint,
                snapshot: None,
            });
        }
        self.request_refresh_all();
    }

    // ---- input surface -------------------------------------------------

    /// Ask the service for exclusive control under the configured name.
    pub fn take_control(&mut self) {
        self.request(Outbound::AcquireControl {
            name: self.operator.clone(),
        });
    }

    /// Give exclusive control back.
    pub fn release_control(&mut self) {
        self.request(Outbound::ReleaseControl);
    }

    /// A position control moved. Gated on editability, joint readiness and
    /// the joint's single-flight channel; values arriving while a write is
    /// in flight are dropped, never queued.
    pub fn slider_moved(&mut self, joint: JointId, pos: i32) {
        if !self.editable() || !self.sync.ready(joint) {
            debug!(%joint, pos, "motion ignored, not editable");
            return;
        }
        let Some(channel) = self.channels.get_mut(&joint) else {
            return;
        };
        match channel.submit(pos) {
            Submit::Issued => {
                self.emit(UiUpdate::MotionPending { joint, busy: true });
                self.request(Outbound::WritePosition { joint, pos });
            }
            Submit::DroppedBusy => {
                self.emit(UiUpdate::MotionDropped { joint, pos });
            }
        }
    }

    /// A bound field gained focus. Returns `false` when editing is not
    /// possible right now (no token, joint not ready, or another edit
    /// session is active).
    pub fn edit_started(&mut self, joint: JointId, limit: LimitKind) -> bool {
        if !self.editable() || !self.sync.ready(joint) {
            return false;
        }
        let initial = self
            .sync
            .snapshot(joint)
            .map(|snapshot| snapshot.limit(limit).to_string())
            .unwrap_or_default();
        if !self.editor.begin(joint, limit, &initial) {
            return false;
        }
        self.emit(UiUpdate::EditText {
            joint,
            limit,
            text: initial,
        });
        true
    }

    /// A key was pressed in the edited field. Returns whether the key is
    /// accepted; suppressed keys leave the text unmutated.
    pub fn edit_key(&mut self, code: u16) -> bool {
        let accepted = self.editor.key(code);
        if accepted {
            if let Some(session) = self.editor.session() {
                self.emit(UiUpdate::EditText {
                    joint: session.joint,
                    limit: session.limit,
                    text: session.text.clone(),
                });
            }
        }
        accepted
    }

    /// Enter was pressed: commit the edit with a single bound write.
    pub fn edit_committed(&mut self) {
        match self.editor.commit(self.clock.now()) {
            Some(Commit::Write {
                joint,
                limit,
                value,
            }) => {
                self.request(Outbound::WriteLimit {
                    joint,
                    limit,
                    value,
                });
            }
            Some(Commit::Invalid { joint, limit }) => {
                self.emit(UiUpdate::EditInvalid { joint, limit });
            }
            None => {}
        }
    }

    /// Escape was pressed: abandon the edit and re-fetch the joint so the
    /// field reverts to authoritative state.
    pub fn edit_cancelled(&mut self) {
        if let Some((joint, _limit)) = self.editor.cancel() {
            let request = self.sync.refresh(joint);
            self.request(request);
            self.emit_editability();
        }
    }

    // ---- completions and timers ----------------------------------------

    /// Apply a service completion posted back to the event thread.
    pub fn apply(&mut self, reply: ServiceReply) {
        match reply {
            ServiceReply::Info { joint, result } => {
                self.sync.apply(joint, result);
                self.emit(UiUpdate::Joint {
                    joint,
                    snapshot: self.sync.snapshot(joint).copied(),
                });
            }
            ServiceReply::PositionWritten { joint, result } => {
                if let Some(channel) = self.channels.get_mut(&joint) {
                    channel.complete(&result);
                }
                self.emit(UiUpdate::MotionPending { joint, busy: false });
                if result.is_err() {
                    self.emit(UiUpdate::MotionFailed { joint });
                }
                // Deliberately no refresh here: motion trusts the optimistic
                // local value instead of flooding the read endpoint.
            }
            ServiceReply::LimitWritten { joint, result, .. } => {
                match self.editor.complete(&result, self.clock.now()) {
                    Some(EditOutcome::Committed { joint, .. }) => {
                        let request = self.sync.refresh(joint);
                        self.request(request);
                    }
                    Some(EditOutcome::Rejected { joint, limit }) => {
                        self.emit(UiUpdate::EditInvalid { joint, limit });
                    }
                    None => {
                        // No matching session (e.g. a stray completion); the
                        // next refresh corrects the display.
                        debug!(%joint, "unmatched bound-write completion");
                    }
                }
            }
            ServiceReply::ControlAcquired { result } => {
                let transitioned = self.arbiter.on_acquire(&result);
                if transitioned {
                    self.emit(UiUpdate::Token(self.arbiter.token().clone()));
                    self.emit_editability();
                    self.request_refresh_all();
                }
            }
            ServiceReply::ControlReleased { result } => {
                self.arbiter.on_release(&result);
                self.emit(UiUpdate::Token(self.arbiter.token().clone()));
                self.emit_editability();
                self.request_refresh_all();
            }
        }
    }

    /// Drive the rollback timer. The host calls this periodically; with a
    /// manual clock in tests the rollback instant is exact.
    pub fn tick(&mut self) {
        if let Some((joint, limit)) = self.editor.tick(self.clock.now()) {
            self.emit(UiUpdate::EditCleared { joint, limit });
            let request = self.sync.refresh(joint);
            self.request(request);
        }
    }

    // ---- plumbing ------------------------------------------------------

    fn emit_editability(&self) {
        self.emit(UiUpdate::Editability {
            editable: self.arbiter.is_mine(),
        });
    }

    fn request_refresh_all(&self) {
        for request in self.sync.refresh_all() {
            self.request(request);
        }
    }

    fn request(&self, request: Outbound) {
        let _ = self.requests.send(request);
    }

    fn emit(&self, update: UiUpdate) {
        let _ = self.updates.send(update);
    }
}
