//! End-to-end tick scenarios for [`DoorMonitor`] against mock adapters.
//!
//! Each test drives the monitor with explicit timestamps, so retry and
//! heartbeat windows are checked at their exact boundaries.

use doorsensor::app::events::AppEvent;
use doorsensor::app::ports::LinkStatus;
use doorsensor::app::service::{DoorMonitor, TickOutcome};
use doorsensor::clock::Timestamp;
use doorsensor::session::{ANNOUNCE_TOPIC, POLL_TOPIC, REPLY_TOPIC};

use crate::mock_hw::{
    MockDoor, MockLink, MockSession, RecordingSink, SessionCall, TOPIC, config, identity, ms,
    secs,
};

const ID: &str = "fridge-door-sensor_fecaefbeadde";

struct Rig {
    monitor: DoorMonitor,
    door: MockDoor,
    link: MockLink,
    session: MockSession,
    sink: RecordingSink,
}

impl Rig {
    fn new(link: MockLink, session: MockSession) -> Self {
        Self {
            monitor: DoorMonitor::new(&config(), identity()),
            door: MockDoor::closed(),
            link,
            session,
            sink: RecordingSink::new(),
        }
    }

    fn online() -> Self {
        Self::new(MockLink::up(), MockSession::new())
    }

    fn tick(&mut self, now: Timestamp) -> TickOutcome {
        self.monitor.tick(
            now,
            &mut self.door,
            &mut self.link,
            &mut self.session,
            &mut self.sink,
        )
    }
}

// ── Door → report ─────────────────────────────────────────────

#[test]
fn door_opened_at_ten_reports_one_at_eleven() {
    let mut rig = Rig::online();
    rig.tick(secs(0));

    rig.door.open();
    let out = rig.tick(secs(10));
    assert_eq!(out.open_duration.as_secs(), 0);
    assert!(!out.reported, "zero is already the reported value");

    rig.tick(ms(10_500));
    let out = rig.tick(secs(11));
    assert!(out.reported);
    assert_eq!(rig.session.published_to(TOPIC), vec!["0", "1"]);
}

#[test]
fn closing_reports_zero_and_logs_duration() {
    let mut rig = Rig::online();
    rig.tick(secs(0));
    rig.door.open();
    rig.tick(secs(5));
    rig.tick(secs(8));
    rig.door.close();
    let out = rig.tick(ms(8_200));

    assert_eq!(out.open_duration.as_secs(), 0);
    assert_eq!(rig.session.published_to(TOPIC), vec!["0", "3", "0"]);
    assert!(
        rig.sink.events.contains(&AppEvent::DoorClosed { open_secs: 3 }),
        "close edge should carry the open duration: {:?}",
        rig.sink.events
    );
}

// ── Link policy ───────────────────────────────────────────────

#[test]
fn link_down_then_up_makes_one_attempt() {
    let mut rig = Rig::new(MockLink::with_status(LinkStatus::Disconnected), MockSession::new());

    rig.tick(secs(0));
    rig.tick(secs(5));
    rig.link.status = LinkStatus::Connected;
    let out = rig.tick(secs(10));

    assert_eq!(rig.link.begins(), 1, "cool-down must suppress the t=5 retry");
    assert!(out.link_up);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::LinkUp), 1);
    assert_eq!(rig.session.connects(), 1, "session connects only once the link is up");
}

#[test]
fn link_retry_needs_strictly_more_than_cooldown() {
    let mut rig = Rig::new(MockLink::with_status(LinkStatus::NoNetworkFound), MockSession::new());

    rig.tick(secs(0));
    rig.tick(secs(30));
    assert_eq!(rig.link.begins(), 1, "exactly 30 s is not enough");
    rig.tick(ms(30_001));
    assert_eq!(rig.link.begins(), 2);
}

#[test]
fn link_loss_retries_immediately() {
    let mut rig = Rig::online();
    rig.tick(secs(0));
    assert_eq!(rig.link.begins(), 0);

    rig.link.status = LinkStatus::ConnectionLost;
    let out = rig.tick(secs(1));
    assert!(!out.link_up);
    assert_eq!(rig.link.begins(), 1, "a drop from up retries without waiting");
}

#[test]
fn unsupported_status_changes_nothing() {
    let mut rig = Rig::online();
    rig.tick(secs(0));
    rig.link.status = LinkStatus::Unsupported;
    let out = rig.tick(secs(1));
    assert!(out.link_up, "unknown status keeps the previous link state");
    assert!(rig.link.calls.is_empty());
}

// ── Connect policy ────────────────────────────────────────────

#[test]
fn connect_subscribes_announces_and_publishes_once() {
    let mut rig = Rig::online();
    let out = rig.tick(secs(0));
    assert!(out.session_connected);

    assert_eq!(
        rig.session.calls,
        vec![
            SessionCall::Connect(ID.to_string()),
            SessionCall::Subscribe(POLL_TOPIC.to_string()),
            SessionCall::Publish(ANNOUNCE_TOPIC.to_string(), ID.to_string()),
            SessionCall::Publish(TOPIC.to_string(), "0".to_string()),
        ]
    );

    rig.tick(secs(1));
    assert_eq!(rig.session.connects(), 1, "no reconnect while connected");
}

#[test]
fn failed_connect_waits_one_second() {
    let mut rig = Rig::new(MockLink::up(), MockSession::refusing());

    rig.tick(ms(0));
    rig.tick(ms(500));
    rig.tick(ms(999));
    assert_eq!(rig.session.connects(), 1);

    rig.tick(ms(1_000));
    assert_eq!(rig.session.connects(), 2, "retry is due at exactly 1 s");

    rig.session.accept_connect = true;
    rig.tick(ms(1_500));
    assert_eq!(rig.session.connects(), 2);
    let out = rig.tick(ms(2_000));
    assert!(out.session_connected);
    assert_eq!(rig.session.connects(), 3);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::SessionConnectFailed), 2);
}

#[test]
fn dropped_session_reconnects_and_reannounces() {
    let mut rig = Rig::online();
    rig.tick(secs(0));
    rig.session.connected = false;
    rig.tick(secs(1));

    assert_eq!(rig.session.connects(), 2);
    assert_eq!(rig.session.subscriptions(), vec![POLL_TOPIC, POLL_TOPIC]);
    assert_eq!(rig.session.published_to(ANNOUNCE_TOPIC), vec![ID, ID]);
}

// ── Publish policy ────────────────────────────────────────────

#[test]
fn heartbeat_republishes_unchanged_value() {
    let mut rig = Rig::online();
    rig.tick(secs(0));
    rig.tick(secs(59));
    assert_eq!(rig.session.published_to(TOPIC), vec!["0"]);

    rig.tick(secs(60));
    assert_eq!(rig.session.published_to(TOPIC), vec!["0", "0"]);
    assert!(rig.sink.events.contains(&AppEvent::Report {
        open_secs: 0,
        heartbeat: true,
        sent: true,
    }));
}

#[test]
fn change_publish_resets_heartbeat() {
    let mut rig = Rig::online();
    rig.tick(secs(0));
    rig.door.open();
    rig.tick(secs(29));
    rig.tick(secs(30));
    rig.door.close();
    rig.tick(secs(31));
    assert_eq!(rig.session.published_to(TOPIC), vec!["0", "1", "0"]);

    rig.tick(secs(60));
    rig.tick(secs(90));
    assert_eq!(rig.session.published_to(TOPIC).len(), 3, "heartbeat counts from t=31");
    rig.tick(secs(91));
    assert_eq!(rig.session.published_to(TOPIC), vec!["0", "1", "0", "0"]);
}

#[test]
fn offline_report_advances_state_then_connect_publishes_twice() {
    let mut rig = Rig::new(MockLink::with_status(LinkStatus::Disconnected), MockSession::new());
    rig.door.open();
    rig.tick(secs(0));
    let out = rig.tick(secs(1));

    assert!(out.reported, "policy fires even without a link");
    assert!(rig.session.calls.is_empty());
    assert!(rig.sink.events.contains(&AppEvent::Report {
        open_secs: 1,
        heartbeat: false,
        sent: false,
    }));

    rig.link.status = LinkStatus::Connected;
    rig.tick(secs(2));
    // One from the connect sequence, one from the change in the same tick.
    assert_eq!(rig.session.published_to(TOPIC), vec!["2", "2"]);
}

// ── Polls ─────────────────────────────────────────────────────

#[test]
fn poll_is_answered_with_identity() {
    let mut rig = Rig::online();
    rig.tick(secs(0));

    rig.session.deliver(POLL_TOPIC);
    rig.session.deliver("home/kitchen/other");
    let out = rig.tick(secs(1));

    assert_eq!(out.polls_answered, 1);
    assert_eq!(rig.session.published_to(REPLY_TOPIC), vec![ID]);
    assert!(rig.session.inbound.is_empty(), "all inbound drained in one tick");
}

#[test]
fn tick_count_advances() {
    let mut rig = Rig::online();
    for s in 0..5 {
        rig.tick(secs(s));
    }
    assert_eq!(rig.monitor.tick_count(), 5);
    assert_eq!(rig.monitor.identity().as_str(), ID);
}
