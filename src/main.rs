//! Fridge door sensor firmware — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                     │
//! │                                                            │
//! │  DoorContact     WifiAdapter    MqttAdapter   LogEventSink │
//! │  (DoorInput)     (Link)         (Session)     (EventSink)  │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ───────────────────   │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            DoorMonitor (pure logic)                  │  │
//! │  │  SensorTracker · LinkManager · SessionManager        │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::wifi::EspWifi;
use log::info;

use doorsensor::adapters::device_id;
use doorsensor::adapters::log_sink::LogEventSink;
use doorsensor::adapters::mqtt::MqttAdapter;
use doorsensor::adapters::time::Esp32TimeAdapter;
use doorsensor::adapters::wifi::WifiAdapter;
use doorsensor::app::ports::ClockPort;
use doorsensor::app::service::DoorMonitor;
use doorsensor::config::SystemConfig;
use doorsensor::drivers::watchdog::Watchdog;
use doorsensor::pins;
use doorsensor::sensors::door::DoorContact;

// The typed pin below must stay in step with the board map.
const _: () = assert!(pins::DOOR_CONTACT_GPIO == 14);

/// Pause between ticks; lets the idle task run and keeps the TWDT quiet.
const TICK_PERIOD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Fridge door sensor v{}           ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration baked in at build time ───────────────
    let config = SystemConfig::embedded().context("embedded configuration")?;
    info!(
        "Config: ssid='{}' broker={} topic={}",
        config.wifi.ssid,
        config.broker_url(),
        config.mqtt.topic
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let mut door_pin = PinDriver::input(peripherals.pins.gpio14)?;
    door_pin.set_pull(Pull::Down)?;
    let mut door = DoorContact::new(door_pin);

    let driver = EspWifi::new(peripherals.modem, sysloop, None)?;
    let mut wifi = WifiAdapter::new(driver, &config.wifi.ssid, &config.wifi.password)?;
    let mut mqtt = MqttAdapter::new(&config.broker_url());

    // ── 4. Identity + core ────────────────────────────────────
    let identity = device_id::identity();
    info!("Device identity: {}", identity);

    let mut monitor = DoorMonitor::new(&config, identity);
    let mut sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();
    let watchdog = Watchdog::new();

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        monitor.tick(clock.now(), &mut door, &mut wifi, &mut mqtt, &mut sink);
        watchdog.feed();
        FreeRtos::delay_ms(TICK_PERIOD_MS);
    }
}
