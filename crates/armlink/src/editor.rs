//! Inline bound-editing state machine.
//!
//! One min/max field may be edited at a time. The field shows the operator's
//! text optimistically; the committed value is never trusted as final — every
//! commit outcome forces a refresh so the display converges on the service's
//! authoritative echo. A rejection flashes an invalid marker and rolls back
//! after a fixed delay.

#![allow(missing_docs)]

use std::time::Duration;

use tracing::debug;

use crate::error::ArmError;
use crate::joint::{JointId, LimitKind};

/// How long the invalid marker stays up before the field rolls back.
pub const ROLLBACK_DELAY: Duration = Duration::from_millis(3000);

/// Key codes accepted while editing, besides the digit row.
pub const KEY_BACKSPACE: u16 = 8;
pub const KEY_LEFT: u16 = 37;
pub const KEY_RIGHT: u16 = 39;
pub const KEY_DELETE: u16 = 46;

const DIGIT_RANGE: std::ops::RangeInclusive<u16> = 48..=57;

/// Whether a key code may reach the edited field. Digits and
/// navigation/editing keys only; everything else is suppressed.
#[must_use]
pub fn key_allowed(code: u16) -> bool {
    matches!(code, KEY_BACKSPACE | KEY_LEFT | KEY_RIGHT | KEY_DELETE)
        || DIGIT_RANGE.contains(&code)
}

/// Where an edit session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// The operator is typing.
    Editing,
    /// A bound write is in flight.
    Committing,
    /// The write was rejected; rolls back at the recorded deadline.
    Error {
        /// When the invalid marker clears and the field reverts.
        rollback_at: Duration,
    },
}

/// One in-progress bound edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Joint being edited.
    pub joint: JointId,
    /// Which bound.
    pub limit: LimitKind,
    /// Text as displayed, digits only.
    pub text: String,
    phase: EditPhase,
}

impl EditSession {
    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> EditPhase {
        self.phase
    }
}

/// What a commit request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Issue a single bound write.
    Write {
        joint: JointId,
        limit: LimitKind,
        value: i32,
    },
    /// The text did not parse; no write is issued, the error path runs
    /// locally.
    Invalid {
        joint: JointId,
        limit: LimitKind,
    },
}

/// What a write completion resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Accepted; the session is over, refresh the joint.
    Committed {
        joint: JointId,
        limit: LimitKind,
    },
    /// Rejected; the invalid marker is up until the rollback deadline.
    Rejected {
        joint: JointId,
        limit: LimitKind,
    },
}

/// Per-client edit session holder. At most one session exists at a time;
/// starting another while one is active (in any phase) is rejected.
#[derive(Debug, Default)]
pub struct LimitEditor {
    session: Option<EditSession>,
}

impl LimitEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Start editing a bound, seeding the field with the authoritative value.
    /// Returns `false` while another session is active.
    pub fn begin(&mut self, joint: JointId, limit: LimitKind, initial: &str) -> bool {
        if self.session.is_some() {
            debug!(%joint, %limit, "edit rejected, another session is active");
            return false;
        }
        self.session = Some(EditSession {
            joint,
            limit,
            text: initial.to_owned(),
            phase: EditPhase::Editing,
        });
        true
    }

    /// Apply a keystroke. Returns `true` when the key is accepted; rejected
    /// keys leave the text unmutated. Digits append, backspace removes the
    /// last character, navigation keys pass through without mutating.
    pub fn key(&mut self, code: u16) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != EditPhase::Editing || !key_allowed(code) {
            return false;
        }
        if DIGIT_RANGE.contains(&code) {
            session.text.push(char::from(u8::try_from(code).unwrap_or(b'0')));
        } else if code == KEY_BACKSPACE {
            session.text.pop();
        }
        true
    }

    /// Commit the edit (Enter). Parses the text and either hands back the
    /// single write to issue, or enters the error path locally when the text
    /// does not parse.
    pub fn commit(&mut self, now: Duration) -> Option<Commit> {
        let session = self.session.as_mut()?;
        if session.phase != EditPhase::Editing {
            return None;
        }
        match session.text.trim().parse::<i32>() {
            Ok(value) => {
                session.phase = EditPhase::Committing;
                Some(Commit::Write {
                    joint: session.joint,
                    limit: session.limit,
                    value,
                })
            }
            Err(_) => {
                session.phase = EditPhase::Error {
                    rollback_at: now + ROLLBACK_DELAY,
                };
                Some(Commit::Invalid {
                    joint: session.joint,
                    limit: session.limit,
                })
            }
        }
    }

    /// Abandon the edit (Escape). Local text is discarded; the caller must
    /// refresh the returned joint so the field reverts to authoritative
    /// state.
    pub fn cancel(&mut self) -> Option<(JointId, LimitKind)> {
        match self.session.as_ref() {
            Some(session) if session.phase == EditPhase::Editing => {
                let target = (session.joint, session.limit);
                self.session = None;
                Some(target)
            }
            _ => None,
        }
    }

    /// Apply a bound-write completion. Success ends the session; a rejection
    /// arms the rollback deadline.
    pub fn complete(
        &mut self,
        result: &Result<(), ArmError>,
        now: Duration,
    ) -> Option<EditOutcome> {
        let session = self.session.as_mut()?;
        if session.phase != EditPhase::Committing {
            return None;
        }
        let joint = session.joint;
        let limit = session.limit;
        match result {
            Ok(()) => {
                self.session = None;
                Some(EditOutcome::Committed { joint, limit })
            }
            Err(err) => {
                debug!(%joint, %limit, %err, "bound write rejected");
                session.phase = EditPhase::Error {
                    rollback_at: now + ROLLBACK_DELAY,
                };
                Some(EditOutcome::Rejected { joint, limit })
            }
        }
    }

    /// Check the rollback deadline. When due, the session ends and the
    /// caller must clear the marker and refresh the returned joint.
    pub fn tick(&mut self, now: Duration) -> Option<(JointId, LimitKind)> {
        match self.session.as_ref() {
            Some(session) => match session.phase {
                EditPhase::Error { rollback_at } if now >= rollback_at => {
                    let target = (session.joint, session.limit);
                    self.session = None;
                    Some(target)
                }
                _ => None,
            },
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Duration = Duration::from_secs(5);

    fn editing(text: &str) -> LimitEditor {
        let mut editor = LimitEditor::new();
        assert!(editor.begin(JointId::Grip, LimitKind::Max, text));
        editor
    }

    #[test]
    fn key_filter_matches_allowed_set() {
        for code in [8, 37, 39, 46] {
            assert!(key_allowed(code));
        }
        for code in 48..=57 {
            assert!(key_allowed(code));
        }
        for code in [0, 7, 9, 13, 27, 38, 40, 45, 47, 58, 65, 97, 189] {
            assert!(!key_allowed(code), "code {code} must be suppressed");
        }
    }

    #[test]
    fn rejected_keys_leave_text_unmutated() {
        let mut editor = editing("100");
        assert!(!editor.key(65));
        assert!(!editor.key(13));
        assert_eq!(editor.session().unwrap().text, "100");
    }

    #[test]
    fn digits_append_and_backspace_removes() {
        let mut editor = editing("");
        assert!(editor.key(50));
        assert!(editor.key(48));
        assert!(editor.key(48));
        assert_eq!(editor.session().unwrap().text, "200");
        assert!(editor.key(KEY_BACKSPACE));
        assert_eq!(editor.session().unwrap().text, "20");
        assert!(editor.key(KEY_LEFT));
        assert!(editor.key(KEY_DELETE));
        assert_eq!(editor.session().unwrap().text, "20");
    }

    #[test]
    fn second_session_is_rejected_in_every_phase() {
        let mut editor = editing("100");
        assert!(!editor.begin(JointId::Base, LimitKind::Min, "0"));

        editor.commit(NOW);
        assert!(!editor.begin(JointId::Base, LimitKind::Min, "0"));

        editor.complete(&Err(ArmError::LimitRejected("too high".into())), NOW);
        assert!(!editor.begin(JointId::Base, LimitKind::Min, "0"));
    }

    #[test]
    fn commit_parses_text_and_goes_in_flight() {
        let mut editor = editing("200");
        let action = editor.commit(NOW).unwrap();
        assert_eq!(
            action,
            Commit::Write {
                joint: JointId::Grip,
                limit: LimitKind::Max,
                value: 200,
            }
        );
        assert_eq!(editor.session().unwrap().phase(), EditPhase::Committing);
        assert!(!editor.key(50));
    }

    #[test]
    fn empty_text_enters_error_path_without_a_write() {
        let mut editor = editing("");
        let action = editor.commit(NOW).unwrap();
        assert_eq!(
            action,
            Commit::Invalid {
                joint: JointId::Grip,
                limit: LimitKind::Max,
            }
        );
        assert!(editor.tick(NOW + ROLLBACK_DELAY).is_some());
        assert!(editor.session().is_none());
    }

    #[test]
    fn rejection_rolls_back_after_exactly_the_delay() {
        let mut editor = editing("200");
        editor.commit(NOW);
        let outcome = editor
            .complete(&Err(ArmError::LimitRejected("too high".into())), NOW)
            .unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Rejected {
                joint: JointId::Grip,
                limit: LimitKind::Max,
            }
        );

        assert!(editor.tick(NOW + ROLLBACK_DELAY - Duration::from_millis(1)).is_none());
        assert_eq!(
            editor.tick(NOW + ROLLBACK_DELAY),
            Some((JointId::Grip, LimitKind::Max))
        );
        assert!(editor.session().is_none());
    }

    #[test]
    fn success_ends_the_session() {
        let mut editor = editing("120");
        editor.commit(NOW);
        let outcome = editor.complete(&Ok(()), NOW).unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Committed {
                joint: JointId::Grip,
                limit: LimitKind::Max,
            }
        );
        assert!(editor.session().is_none());
    }

    #[test]
    fn escape_discards_only_while_editing() {
        let mut editor = editing("140");
        assert_eq!(editor.cancel(), Some((JointId::Grip, LimitKind::Max)));
        assert!(editor.session().is_none());

        let mut editor = editing("140");
        editor.commit(NOW);
        assert_eq!(editor.cancel(), None);
        assert!(editor.session().is_some());
    }
}
