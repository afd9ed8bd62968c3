//! Publish-policy tests against [`SessionManager`] directly.

use core::time::Duration;

use doorsensor::config::TimingConfig;
use doorsensor::session::SessionManager;

use crate::mock_hw::{MockSession, RecordingSink, TOPIC, secs};

fn connected() -> MockSession {
    MockSession {
        connected: true,
        ..MockSession::new()
    }
}

#[test]
fn steady_value_goes_out_on_change_and_heartbeat_only() {
    let mut mgr = SessionManager::new(TOPIC, &TimingConfig::default());
    let mut session = connected();
    let mut sink = RecordingSink::new();
    let three = Duration::from_secs(3);

    let fired: Vec<u64> = (0..=65)
        .filter(|&s| mgr.report(secs(s), true, three, &mut session, &mut sink))
        .collect();

    assert_eq!(fired, vec![0, 60]);
    assert_eq!(session.published_to(TOPIC), vec!["3", "3"]);
}

#[test]
fn boot_zero_waits_for_heartbeat() {
    let mut mgr = SessionManager::new(TOPIC, &TimingConfig::default());
    let mut session = connected();
    let mut sink = RecordingSink::new();

    for s in 0..60 {
        assert!(!mgr.report(secs(s), true, Duration::ZERO, &mut session, &mut sink));
    }
    assert!(mgr.report(secs(60), true, Duration::ZERO, &mut session, &mut sink));
    assert_eq!(session.published_to(TOPIC), vec!["0"]);
}

#[test]
fn offline_fire_is_not_repeated_when_link_returns() {
    let mut mgr = SessionManager::new(TOPIC, &TimingConfig::default());
    let mut session = MockSession::new();
    let mut sink = RecordingSink::new();
    let five = Duration::from_secs(5);

    assert!(mgr.report(secs(1), false, five, &mut session, &mut sink));
    session.connected = true;
    assert!(!mgr.report(secs(2), true, five, &mut session, &mut sink));
    assert!(session.calls.is_empty());
}

#[test]
fn custom_heartbeat_period() {
    let timing = TimingConfig {
        heartbeat_secs: 10,
        ..TimingConfig::default()
    };
    let mut mgr = SessionManager::new(TOPIC, &timing);
    let mut session = connected();
    let mut sink = RecordingSink::new();

    assert!(!mgr.report(secs(9), true, Duration::ZERO, &mut session, &mut sink));
    assert!(mgr.report(secs(10), true, Duration::ZERO, &mut session, &mut sink));
}
