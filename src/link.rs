//! WiFi Link Manager.
//!
//! Decides, once per tick, whether to (re)start association.  The radio is
//! never driven in a busy loop: a retry is issued only when
//!
//! 1. no attempt has ever been made, or
//! 2. the link was up on the previous evaluation and has just dropped, or
//! 3. the retry cool-down (30 s by default) has elapsed since the last
//!    attempt.
//!
//! Case 2 reacts instantly to a lost AP; case 3 guarantees progress when an
//! attempt fails without any visible status change.  All non-connected
//! statuses share this one policy.  There is no attempt counter and no
//! backoff growth.

use core::time::Duration;

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, LinkPort, LinkStatus};
use crate::clock::Timestamp;

pub struct LinkManager {
    status: LinkStatus,
    is_up: bool,
    last_attempt_at: Option<Timestamp>,
    retry_after: Duration,
}

impl LinkManager {
    pub fn new(retry_after: Duration) -> Self {
        Self {
            status: LinkStatus::Idle,
            is_up: false,
            last_attempt_at: None,
            retry_after,
        }
    }

    /// Poll the link status and issue a reconnect if the policy allows.
    /// Returns whether the link is up.
    pub fn evaluate(
        &mut self,
        now: Timestamp,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> bool {
        self.status = link.status();

        match self.status {
            LinkStatus::Idle
            | LinkStatus::NoNetworkFound
            | LinkStatus::ConnectFailed
            | LinkStatus::ConnectionLost
            | LinkStatus::Disconnected => {
                if self.retry_due(now) {
                    info!("WiFi reconnect ({:?})", self.status);
                    link.disconnect();
                    link.begin();
                    self.last_attempt_at = Some(now);
                    self.is_up = false;
                    sink.emit(&AppEvent::LinkReconnect);
                }
            }

            LinkStatus::Connected => {
                if !self.is_up {
                    info!("WiFi connected");
                    self.is_up = true;
                    sink.emit(&AppEvent::LinkUp);
                }
            }

            LinkStatus::Unsupported => {}
        }

        self.is_up
    }

    fn retry_due(&self, now: Timestamp) -> bool {
        match self.last_attempt_at {
            None => true,
            Some(_) if self.is_up => true,
            Some(at) => now.duration_since(at) > self.retry_after,
        }
    }

    pub fn is_up(&self) -> bool {
        self.is_up
    }

    /// Status seen on the last evaluation.
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn last_attempt_at(&self) -> Option<Timestamp> {
        self.last_attempt_at
    }
}
