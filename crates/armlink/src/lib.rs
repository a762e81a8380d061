//! `armlink` - exclusive-access control client for a REST-exposed robotic arm.
//!
//! The arm is a shared physical device behind a REST service. Any number of
//! clients may watch it, but motion and configuration writes are gated by a
//! server-held access token granted to one named client at a time. This crate
//! implements the client-side arbitration and command-synchronization layer:
//! token acquire/release, single-flight motion writes per joint, inline
//! min/max bound editing with timed rollback, and authoritative state
//! resynchronization. Rendering is out of scope; the core emits [`UiUpdate`]
//! values for a host binding to apply.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// REST service contract and the HTTP implementation.
pub mod api;
/// Access token acquire/release state machine.
pub mod arbiter;
/// Single-flight motion command channel.
pub mod channel;
/// Clock seam for the rollback timer.
pub mod clock;
/// Client configuration loading.
pub mod config;
/// Event-thread controller wiring all components.
pub mod console;
/// Inline bound-editing state machine.
pub mod editor;
/// Client errors.
pub mod error;
/// Request, reply and UI update vocabularies.
pub mod event;
/// Joint identifiers and authoritative state.
pub mod joint;
/// Authoritative state resynchronization.
pub mod sync;
/// Worker that executes outbound requests against the service.
pub mod transport;

pub use arbiter::AccessToken;
pub use config::ClientConfig;
pub use console::ArmConsole;
pub use error::ArmError;
pub use event::{Outbound, ServiceReply, UiUpdate};
pub use joint::{JointId, JointSnapshot, LimitKind};
