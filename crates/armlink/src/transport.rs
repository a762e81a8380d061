//! Worker that executes outbound requests against the service.
//!
//! Requests are executed off the event thread, one worker thread per
//! request, and completions are posted back as [`ServiceReply`] values. No
//! ordering is guaranteed across requests; per-joint ordering comes from the
//! console's single-flight gate, not from here.

#![allow(missing_docs)]

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::api::ArmService;
use crate::event::{Outbound, ServiceReply};

/// Execute one request synchronously and shape its completion.
pub fn execute(service: &dyn ArmService, request: Outbound) -> ServiceReply {
    match request {
        Outbound::FetchInfo { joint } => ServiceReply::Info {
            joint,
            result: service.joint_info(joint),
        },
        Outbound::WritePosition { joint, pos } => ServiceReply::PositionWritten {
            joint,
            result: service.set_position(joint, pos),
        },
        Outbound::WriteLimit {
            joint,
            limit,
            value,
        } => ServiceReply::LimitWritten {
            joint,
            limit,
            result: service.set_limit(joint, limit, value),
        },
        Outbound::AcquireControl { name } => ServiceReply::ControlAcquired {
            result: service.acquire_control(&name),
        },
        Outbound::ReleaseControl => ServiceReply::ControlReleased {
            result: service.release_control(),
        },
    }
}

/// Spawn the dispatch loop: pulls requests until the sending side closes,
/// runs each on its own thread, and posts completions on `replies`. Replies
/// for receivers that went away are dropped silently.
pub fn spawn(
    service: Arc<dyn ArmService>,
    requests: Receiver<Outbound>,
    replies: Sender<ServiceReply>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(request) = requests.recv() {
            debug!(?request, "dispatching");
            let service = Arc::clone(&service);
            let replies = replies.clone();
            thread::spawn(move || {
                let reply = execute(service.as_ref(), request);
                let _ = replies.send(reply);
            });
        }
    })
}
