//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing the monitor's events to the
//! ESP-IDF logger (UART / USB-CDC in production), one tagged line each.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::DoorOpened => info!("DOOR | opened"),
            AppEvent::DoorClosed { open_secs } => {
                info!("DOOR | closed after {}s", open_secs);
            }
            AppEvent::LinkReconnect => info!("LINK | reconnect"),
            AppEvent::LinkUp => info!("LINK | up"),
            AppEvent::SessionConnecting => info!("MQTT | connecting"),
            AppEvent::SessionConnected => info!("MQTT | connected"),
            AppEvent::SessionConnectFailed => warn!("MQTT | connection failed"),
            AppEvent::Report { open_secs, heartbeat, sent } => {
                let kind = if *heartbeat { "heartbeat" } else { "change" };
                let delivery = if *sent { "sent" } else { "offline" };
                if *open_secs == 0 {
                    info!("REPORT | Closed ({}, {})", kind, delivery);
                } else {
                    info!("REPORT | Open for {}s ({}, {})", open_secs, kind, delivery);
                }
            }
            AppEvent::PollAnswered => info!("MQTT | poll answered"),
        }
    }
}
