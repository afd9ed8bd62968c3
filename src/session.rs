//! MQTT Session & Reporting Manager.
//!
//! Owns the messaging session on top of an up link and decides what to
//! publish.
//!
//! ## Connect policy
//!
//! Only while the link is up.  When the session is down and either no
//! attempt has failed yet or the retry cool-down (1 s by default) has
//! passed since the last failure, connect with the device identity as the
//! client id.  On success, in the same tick:
//!
//! 1. subscribe to [`POLL_TOPIC`]
//! 2. publish the identity to [`ANNOUNCE_TOPIC`]
//! 3. publish the current open duration to the reporting topic
//!
//! ## Publish policy
//!
//! Evaluated on every tick, after the connect policy.  Fires when the open
//! duration differs from the last reported value, or when the heartbeat
//! period has passed since the last publish.  Firing always advances the
//! reported value and the heartbeat timer; the value only reaches the
//! broker if the link and session are up at that moment.  A value
//! published by a connect in the same tick may therefore go out twice.
//!
//! ## Polls
//!
//! Any message on [`POLL_TOPIC`] is answered with the identity on
//! [`REPLY_TOPIC`].

use core::fmt::Write;
use core::time::Duration;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SessionPort};
use crate::clock::Timestamp;
use crate::config::TimingConfig;
use crate::identity::Identity;

/// Control topic; any message here is a poll.
pub const POLL_TOPIC: &str = "meta/mqtt-agents/poll";
/// Receives the identity after every successful connect.
pub const ANNOUNCE_TOPIC: &str = "meta/mqtt-agents/announce";
/// Receives the identity in answer to a poll.
pub const REPLY_TOPIC: &str = "meta/mqtt-agents/reply";

type Payload = heapless::String<20>;

fn seconds_payload(value: Duration) -> Payload {
    let mut s = Payload::new();
    // u64::MAX is 20 digits.
    let _ = write!(s, "{}", value.as_secs());
    s
}

pub struct SessionManager {
    topic: String,
    retry_after: Duration,
    heartbeat: Duration,
    is_connected: bool,
    last_connect_attempt_at: Option<Timestamp>,
    last_publish_at: Timestamp,
    last_published_value: Option<Duration>,
}

impl SessionManager {
    pub fn new(topic: &str, timing: &TimingConfig) -> Self {
        Self {
            topic: topic.to_owned(),
            retry_after: timing.session_retry(),
            heartbeat: timing.heartbeat(),
            is_connected: false,
            last_connect_attempt_at: None,
            last_publish_at: Timestamp::ZERO,
            last_published_value: None,
        }
    }

    /// Reply to every poll that arrived since the last tick.
    /// Returns how many were answered.
    pub fn answer_polls(
        &mut self,
        identity: &Identity,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut answered = 0;
        while let Some(msg) = session.take_inbound() {
            if msg.topic.as_str() != POLL_TOPIC {
                continue;
            }
            if let Err(e) = session.publish(REPLY_TOPIC, identity.as_str()) {
                warn!("MQTT poll reply failed: {}", e);
            }
            answered += 1;
            sink.emit(&AppEvent::PollAnswered);
        }
        answered
    }

    /// Connect policy.  Returns whether the session is connected afterwards.
    pub fn maintain(
        &mut self,
        now: Timestamp,
        link_up: bool,
        identity: &Identity,
        value: Duration,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) -> bool {
        self.is_connected = session.is_connected();
        if !link_up || self.is_connected || !self.retry_due(now) {
            return self.is_connected;
        }

        info!("MQTT connecting");
        sink.emit(&AppEvent::SessionConnecting);

        match session.connect(identity.as_str()) {
            Ok(()) => {
                info!("MQTT connected");
                self.is_connected = true;
                if let Err(e) = session.subscribe(POLL_TOPIC) {
                    warn!("MQTT subscribe to {} failed: {}", POLL_TOPIC, e);
                }
                if let Err(e) = session.publish(ANNOUNCE_TOPIC, identity.as_str()) {
                    warn!("MQTT announce failed: {}", e);
                }
                if let Err(e) = session.publish(&self.topic, &seconds_payload(value)) {
                    warn!("MQTT publish to {} failed: {}", self.topic, e);
                }
                self.last_publish_at = now;
                sink.emit(&AppEvent::SessionConnected);
            }
            Err(e) => {
                warn!("MQTT connection failed: {}", e);
                self.last_connect_attempt_at = Some(now);
                sink.emit(&AppEvent::SessionConnectFailed);
            }
        }
        self.is_connected
    }

    /// Publish policy.  Returns whether the policy fired this tick.
    pub fn report(
        &mut self,
        now: Timestamp,
        link_up: bool,
        value: Duration,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) -> bool {
        // Boot counts as a reported closed door: nothing goes out until the
        // value moves or the first heartbeat is due.
        let changed = value != self.last_published_value.unwrap_or(Duration::ZERO);
        let heartbeat = now.duration_since(self.last_publish_at) >= self.heartbeat;
        if !changed && !heartbeat {
            return false;
        }

        self.last_published_value = Some(value);
        self.last_publish_at = now;

        let sent = link_up
            && session.is_connected()
            && match session.publish(&self.topic, &seconds_payload(value)) {
                Ok(()) => true,
                Err(e) => {
                    warn!("MQTT publish to {} failed: {}", self.topic, e);
                    false
                }
            };

        sink.emit(&AppEvent::Report {
            open_secs: value.as_secs(),
            heartbeat: !changed,
            sent,
        });
        true
    }

    fn retry_due(&self, now: Timestamp) -> bool {
        match self.last_connect_attempt_at {
            None => true,
            Some(at) => now.duration_since(at) >= self.retry_after,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn last_connect_attempt_at(&self) -> Option<Timestamp> {
        self.last_connect_attempt_at
    }

    pub fn last_publish_at(&self) -> Timestamp {
        self.last_publish_at
    }

    pub fn last_published_value(&self) -> Option<Duration> {
        self.last_published_value
    }
}
