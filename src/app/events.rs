//! Outbound application events.
//!
//! The [`DoorMonitor`](super::service::DoorMonitor) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They drive the human
//! readable status lines on the serial console and are what the tests
//! observe; they never feed back into the control logic.

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The door contact released.
    DoorOpened,

    /// The door contact closed again after `open_secs`.
    DoorClosed { open_secs: u64 },

    /// Link Manager issued a disconnect + begin.
    LinkReconnect,

    /// WiFi association completed.
    LinkUp,

    /// MQTT connect attempt starting.
    SessionConnecting,

    /// MQTT session established (subscribe + announce already sent).
    SessionConnected,

    /// MQTT connect attempt failed; retried after the cool-down.
    SessionConnectFailed,

    /// The publish policy fired.  `sent` is false when the value could not
    /// be written because the link or session was down.
    Report { open_secs: u64, heartbeat: bool, sent: bool },

    /// A poll on the control topic was answered.
    PollAnswered,
}
