//! The monitor wired to the host simulations of the real adapters.
//!
//! `SimDoorPin` reads a process-wide level, so only
//! `sim_stack_reports_open_door` touches it; the rest use `MockDoor`.

use doorsensor::adapters::mqtt::MqttAdapter;
use doorsensor::adapters::wifi::WifiAdapter;
use doorsensor::app::service::DoorMonitor;
use doorsensor::sensors::door::{DoorContact, SimDoorPin, sim_set_door_open};
use doorsensor::session::{ANNOUNCE_TOPIC, POLL_TOPIC, REPLY_TOPIC};

use crate::mock_hw::{MockDoor, RecordingSink, TOPIC, config, identity, ms, secs};

const ID: &str = "fridge-door-sensor_fecaefbeadde";

fn published(mqtt: &MqttAdapter, topic: &str) -> Vec<String> {
    mqtt.sim_published()
        .iter()
        .filter(|(t, _)| t == topic)
        .map(|(_, p)| p.clone())
        .collect()
}

fn sim_stack() -> (DoorMonitor, WifiAdapter, MqttAdapter, RecordingSink) {
    let cfg = config();
    let wifi = WifiAdapter::new(&cfg.wifi.ssid, &cfg.wifi.password).expect("valid credentials");
    let mqtt = MqttAdapter::new(&cfg.broker_url());
    (DoorMonitor::new(&cfg, identity()), wifi, mqtt, RecordingSink::new())
}

#[test]
fn sim_stack_reports_open_door() {
    let (mut monitor, mut wifi, mut mqtt, mut sink) = sim_stack();
    let mut door = DoorContact::new(SimDoorPin);

    sim_set_door_open(false);
    let out = monitor.tick(secs(0), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(!out.link_up, "association completes on a later poll");

    let out = monitor.tick(secs(1), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(out.link_up);
    assert!(out.session_connected);
    assert_eq!(mqtt.sim_subscriptions(), &[POLL_TOPIC.to_string()]);
    assert_eq!(published(&mqtt, ANNOUNCE_TOPIC), vec![ID]);

    sim_set_door_open(true);
    monitor.tick(secs(3), &mut door, &mut wifi, &mut mqtt, &mut sink);
    monitor.tick(secs(5), &mut door, &mut wifi, &mut mqtt, &mut sink);
    sim_set_door_open(false);
    monitor.tick(secs(6), &mut door, &mut wifi, &mut mqtt, &mut sink);

    assert_eq!(published(&mqtt, TOPIC), vec!["0", "2", "0"]);
}

#[test]
fn sim_stack_answers_polls() {
    let (mut monitor, mut wifi, mut mqtt, mut sink) = sim_stack();
    let mut door = MockDoor::closed();

    monitor.tick(secs(0), &mut door, &mut wifi, &mut mqtt, &mut sink);
    monitor.tick(secs(1), &mut door, &mut wifi, &mut mqtt, &mut sink);

    mqtt.sim_deliver(POLL_TOPIC);
    let out = monitor.tick(secs(2), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert_eq!(out.polls_answered, 1);
    assert_eq!(published(&mqtt, REPLY_TOPIC), vec![ID]);
}

#[test]
fn sim_wifi_drop_reassociates_without_cooldown() {
    let (mut monitor, mut wifi, mut mqtt, mut sink) = sim_stack();
    let mut door = MockDoor::closed();

    monitor.tick(secs(0), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(monitor.tick(secs(1), &mut door, &mut wifi, &mut mqtt, &mut sink).link_up);

    wifi.sim_drop();
    let out = monitor.tick(secs(10), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(!out.link_up);
    assert_eq!(monitor.link().last_attempt_at(), Some(secs(10)));

    let out = monitor.tick(secs(11), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(out.link_up);
}

#[test]
fn sim_broker_drop_reannounces() {
    let (mut monitor, mut wifi, mut mqtt, mut sink) = sim_stack();
    let mut door = MockDoor::closed();

    monitor.tick(secs(0), &mut door, &mut wifi, &mut mqtt, &mut sink);
    monitor.tick(secs(1), &mut door, &mut wifi, &mut mqtt, &mut sink);

    mqtt.sim_drop();
    mqtt.sim_set_reachable(false);
    let out = monitor.tick(secs(2), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(!out.session_connected);

    mqtt.sim_set_reachable(true);
    monitor.tick(ms(2_500), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert_eq!(published(&mqtt, ANNOUNCE_TOPIC).len(), 1, "retry waits a full second");

    let out = monitor.tick(secs(3), &mut door, &mut wifi, &mut mqtt, &mut sink);
    assert!(out.session_connected);
    assert_eq!(published(&mqtt, ANNOUNCE_TOPIC), vec![ID, ID]);
}
