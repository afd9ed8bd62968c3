//! Door monitor service — the hexagonal core.
//!
//! [`DoorMonitor`] owns every piece of process-lifetime state (tracker,
//! link, session, identity) and runs one control step per call to
//! [`DoorMonitor::tick`].  All I/O flows through port traits injected at the
//! call site, making the whole service testable with mock adapters.
//!
//! ```text
//!  DoorInputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                    │         DoorMonitor          │
//!       LinkPort ◀──▶│  Tracker · Link · Session    │◀──▶ SessionPort
//!                    └──────────────────────────────┘
//! ```
//!
//! A tick never blocks.  Cool-downs are enforced by comparing timestamps on
//! later ticks, so a slow tick only delays the next retry.

use core::time::Duration;

use log::info;

use crate::clock::Timestamp;
use crate::config::SystemConfig;
use crate::identity::Identity;
use crate::link::LinkManager;
use crate::session::SessionManager;
use crate::tracker::{DoorTransition, SensorTracker};

use super::events::AppEvent;
use super::ports::{DoorInputPort, EventSink, LinkPort, SessionPort};

/// What a single tick observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub open_duration: Duration,
    pub link_up: bool,
    pub session_connected: bool,
    pub reported: bool,
    pub polls_answered: usize,
}

pub struct DoorMonitor {
    identity: Identity,
    tracker: SensorTracker,
    link: LinkManager,
    session: SessionManager,
    tick_count: u64,
}

impl DoorMonitor {
    pub fn new(config: &SystemConfig, identity: Identity) -> Self {
        info!(
            "DoorMonitor: id={} topic={} link_retry={}s session_retry={}s heartbeat={}s",
            identity,
            config.mqtt.topic,
            config.timing.link_retry_secs,
            config.timing.session_retry_secs,
            config.timing.heartbeat_secs,
        );
        Self {
            identity,
            tracker: SensorTracker::new(),
            link: LinkManager::new(config.timing.link_retry()),
            session: SessionManager::new(&config.mqtt.topic, &config.timing),
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control step:
    /// sample door → link policy → session service → polls → connect
    /// policy → publish policy.
    pub fn tick(
        &mut self,
        now: Timestamp,
        door: &mut impl DoorInputPort,
        link: &mut impl LinkPort,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;

        // 1. Door
        match self.tracker.update(door.contact_closed(), now) {
            Some(DoorTransition::Opened) => sink.emit(&AppEvent::DoorOpened),
            Some(DoorTransition::Closed(d)) => {
                sink.emit(&AppEvent::DoorClosed { open_secs: d.as_secs() });
            }
            None => {}
        }
        let value = self.tracker.open_duration();

        // 2. Link
        let link_up = self.link.evaluate(now, link, sink);

        // 3. Session housekeeping; polls are answered in this same tick.
        session.service();
        let polls_answered = self.session.answer_polls(&self.identity, session, sink);

        // 4. Connect, then publish
        let session_connected =
            self.session
                .maintain(now, link_up, &self.identity, value, session, sink);
        let reported = self.session.report(now, link_up, value, session, sink);

        TickOutcome {
            open_duration: value,
            link_up,
            session_connected,
            reported,
            polls_answered,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn tracker(&self) -> &SensorTracker {
        &self.tracker
    }

    pub fn link(&self) -> &LinkManager {
        &self.link
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
