#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use armlink::clock::ManualClock;
use armlink::{ArmConsole, JointId, JointSnapshot, Outbound, ServiceReply, UiUpdate};

/// Console under test, wired to in-memory channels and a manual clock. Tests
/// pop outbound requests and inject replies by hand, which makes any
/// interleaving of completions expressible.
pub struct Harness {
    pub console: ArmConsole,
    pub clock: ManualClock,
    pub requests: Receiver<Outbound>,
    pub updates: Receiver<UiUpdate>,
}

impl Harness {
    pub fn new(operator: &str) -> Self {
        let clock = ManualClock::new();
        let (request_tx, request_rx) = mpsc::channel();
        let (update_tx, update_rx) = mpsc::channel();
        let console = ArmConsole::new(
            operator.into(),
            Arc::new(clock.clone()),
            request_tx,
            update_tx,
        );
        Self {
            console,
            clock,
            requests: request_rx,
            updates: update_rx,
        }
    }

    /// Start the console, answer the initial refresh and discard the
    /// produced traffic.
    pub fn booted(operator: &str) -> Self {
        let mut harness = Self::new(operator);
        harness.console.start();
        harness.answer_refreshes();
        harness.drain_updates();
        harness
    }

    /// Booted and holding the access token.
    pub fn in_control(operator: &str) -> Self {
        let mut harness = Self::booted(operator);
        harness.grant_control();
        harness
    }

    pub fn drain_requests(&self) -> Vec<Outbound> {
        self.requests.try_iter().collect()
    }

    pub fn drain_updates(&self) -> Vec<UiUpdate> {
        self.updates.try_iter().collect()
    }

    /// Answer every outstanding info fetch with the default snapshot;
    /// non-fetch requests are dropped.
    pub fn answer_refreshes(&mut self) {
        for request in self.drain_requests() {
            if let Outbound::FetchInfo { joint } = request {
                self.console.apply(ServiceReply::Info {
                    joint,
                    result: Ok(default_snapshot(joint)),
                });
            }
        }
    }

    /// Acquire the token with a successful reply and settle the follow-up
    /// refresh.
    pub fn grant_control(&mut self) {
        self.console.take_control();
        self.drain_requests();
        self.console
            .apply(ServiceReply::ControlAcquired { result: Ok(()) });
        self.answer_refreshes();
        self.drain_updates();
    }

    /// Advance the manual clock and run the timer.
    pub fn advance(&mut self, millis: u64) {
        self.clock.advance(Duration::from_millis(millis));
        self.console.tick();
    }
}

/// Factory bounds for each joint, matching the hardware defaults.
pub fn default_snapshot(joint: JointId) -> JointSnapshot {
    let (min, max) = match joint {
        JointId::Base => (0, 180),
        JointId::Shoulder | JointId::Wrist => (50, 140),
        JointId::Grip => (80, 100),
    };
    JointSnapshot { pos: 90, min, max }
}
