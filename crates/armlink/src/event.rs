//! Request, reply and UI update vocabularies.
//!
//! The console never performs I/O. It emits [`Outbound`] requests for the
//! transport to execute, consumes [`ServiceReply`] completions posted back to
//! the event thread, and publishes [`UiUpdate`] values for the host binding
//! to render.

#![allow(missing_docs)]

use smol_str::SmolStr;

use crate::arbiter::AccessToken;
use crate::error::ArmError;
use crate::joint::{JointId, JointSnapshot, LimitKind};

/// A request the transport should issue against the arm service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Fetch `{pos, min, max}` for one joint.
    FetchInfo {
        joint: JointId,
    },
    /// Write a joint position.
    WritePosition {
        joint: JointId,
        pos: i32,
    },
    /// Write one bound of a joint.
    WriteLimit {
        joint: JointId,
        limit: LimitKind,
        value: i32,
    },
    /// Acquire the access token under the given name.
    AcquireControl {
        name: SmolStr,
    },
    /// Release the access token.
    ReleaseControl,
}

/// Completion of an [`Outbound`] request, delivered back to the event thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    /// Completion of [`Outbound::FetchInfo`].
    Info {
        joint: JointId,
        result: Result<JointSnapshot, ArmError>,
    },
    /// Completion of [`Outbound::WritePosition`].
    PositionWritten {
        joint: JointId,
        result: Result<(), ArmError>,
    },
    /// Completion of [`Outbound::WriteLimit`].
    LimitWritten {
        joint: JointId,
        limit: LimitKind,
        result: Result<(), ArmError>,
    },
    /// Completion of [`Outbound::AcquireControl`].
    ControlAcquired {
        result: Result<(), ArmError>,
    },
    /// Completion of [`Outbound::ReleaseControl`].
    ControlReleased {
        result: Result<(), ArmError>,
    },
}

/// Pure state emitted for the host binding to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// A joint's authoritative state changed. `None` means the joint has no
    /// authoritative snapshot yet and should render disabled.
    Joint {
        joint: JointId,
        snapshot: Option<JointSnapshot>,
    },
    /// The access token changed; the holder name in `Other` is surfaced to
    /// the operator verbatim.
    Token(AccessToken),
    /// Whether controls should accept input. Recomputed from the token on
    /// every emission, never cached.
    Editability {
        editable: bool,
    },
    /// Motion write in flight for this joint (pending indicator).
    MotionPending {
        joint: JointId,
        busy: bool,
    },
    /// A motion submission was dropped because one was already in flight.
    MotionDropped {
        joint: JointId,
        pos: i32,
    },
    /// A motion write failed; absorbed here, surfaced only as this update.
    MotionFailed {
        joint: JointId,
    },
    /// The text of the field being edited (optimistic display).
    EditText {
        joint: JointId,
        limit: LimitKind,
        text: String,
    },
    /// The edited bound was rejected; show the invalid marker.
    EditInvalid {
        joint: JointId,
        limit: LimitKind,
    },
    /// Clear the invalid marker after the rollback delay.
    EditCleared {
        joint: JointId,
        limit: LimitKind,
    },
}
