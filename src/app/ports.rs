//! Port traits — the hexagonal boundary between the monitor core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorMonitor (domain)
//! ```
//!
//! Driven adapters (door input, WiFi, MQTT, clock, event sinks) implement
//! these traits.  The [`DoorMonitor`](super::service::DoorMonitor) consumes
//! them via generics, so the core never touches the radio or the broker
//! directly and every policy can be exercised with mocks.
//!
//! Every method here must return promptly.  The control loop is
//! single-threaded and never blocks; adapters that front slow operations
//! start them and report progress on later calls.

use core::fmt;

use crate::clock::Timestamp;

// ───────────────────────────────────────────────────────────────
// Door input port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

pub trait DoorInputPort {
    /// `true` while the door contact is closed (door shut).
    fn contact_closed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Monotonic time since boot.
    fn now(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: WiFi station)
// ───────────────────────────────────────────────────────────────

/// Association status as reported by the WiFi driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Driver is between states (e.g. association in progress).
    Idle,
    /// The configured network was not found in the scan.
    NoNetworkFound,
    /// Association or authentication was rejected.
    ConnectFailed,
    /// A previously established association was lost.
    ConnectionLost,
    /// Not associated and not trying.
    Disconnected,
    /// Associated with an IP address.
    Connected,
    /// Scan-completed / no-hardware reports; carry no link information.
    Unsupported,
}

impl LinkStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

/// The monitor only needs status polling plus the two actions it issues
/// when it decides to retry.  `begin` must only start association; the
/// outcome shows up in later `status` calls.
pub trait LinkPort {
    fn status(&mut self) -> LinkStatus;
    fn disconnect(&mut self);
    fn begin(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    InvalidSsid,
    InvalidPassword,
    /// The driver could not be created or configured.
    DriverFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes, or empty for open)"),
            Self::DriverFailed => write!(f, "WiFi driver failure"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Session port (driven adapter: MQTT client)
// ───────────────────────────────────────────────────────────────

/// Marker for a message received on a subscribed topic.  Only the topic is
/// kept; payloads are never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: heapless::String<64>,
}

impl InboundMessage {
    /// Build from a topic, truncating at a char boundary if it is too long.
    pub fn new(topic: &str) -> Self {
        let mut t = heapless::String::new();
        for c in topic.chars() {
            if t.push(c).is_err() {
                break;
            }
        }
        Self { topic: t }
    }
}

pub trait SessionPort {
    /// Attempt to bring the session up with `client_id`.  `Ok` means the
    /// session is connected now.
    fn connect(&mut self, client_id: &str) -> Result<(), SessionError>;

    fn is_connected(&self) -> bool;

    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError>;

    /// Fire-and-forget publish.  `Ok` only means the message was handed to
    /// the client, not that it reached the broker.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), SessionError>;

    /// Per-tick housekeeping (keepalive, connection-state refresh, moving
    /// received messages into the pending queue).
    fn service(&mut self);

    /// Pop the next pending inbound message, if any.
    fn take_inbound(&mut self) -> Option<InboundMessage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Operation requires a connected session.
    NotConnected,
    /// Connect attempt failed or is still in progress.
    ConnectFailed,
    /// The client refused the subscribe request.
    SubscribeFailed,
    /// The client refused the publish request.
    PublishFailed,
    /// The client could not be created.
    ClientInit,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "session not connected"),
            Self::ConnectFailed => write!(f, "MQTT connect failed"),
            Self::SubscribeFailed => write!(f, "MQTT subscribe failed"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
            Self::ClientInit => write!(f, "MQTT client init failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → diagnostics)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s through
/// this port.  It is a side channel only; nothing in the control logic
/// depends on what the sink does.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
