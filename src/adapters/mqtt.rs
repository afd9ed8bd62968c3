//! MQTT session adapter.
//!
//! Implements [`SessionPort`] on top of the ESP-IDF MQTT client.
//!
//! The ESP-IDF client runs its own task and reports through a callback.
//! The callback only touches [`Shared`]: it flips the connected flag, bumps
//! the connection epoch, and pushes received-topic markers into a bounded
//! channel.  The control loop drains that channel once per tick, so inbound
//! handling stays on the loop thread.
//!
//! The client connects in the background.  `connect` therefore reports
//! success only once the broker has acknowledged, and `is_connected` stays
//! false for a fresh connection until `connect` has been called for it.
//! That keeps the subscribe + announce step tied to every new connection,
//! including ones the client re-established on its own.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: an in-memory broker for host-side tests.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::ports::{InboundMessage, SessionError, SessionPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

/// Received messages held between ticks.  Overflow is dropped; a poll
/// needs only one reply.
const INBOUND_CAPACITY: usize = 8;

/// State written by the client task and read by the control loop.
struct Shared {
    connected: AtomicBool,
    /// Incremented on every broker CONNACK.
    epoch: AtomicU32,
    inbound: Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_CAPACITY>,
}

impl Shared {
    fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            epoch: AtomicU32::new(0),
            inbound: Channel::new(),
        }
    }

    fn on_connected(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.connected.store(true, Ordering::Release);
    }

    fn on_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
    }

    fn on_received(&self, topic: &str) {
        if self.inbound.try_send(InboundMessage::new(topic)).is_err() {
            warn!("MQTT: inbound queue full, dropping message on {}", topic);
        }
    }
}

pub struct MqttAdapter {
    broker_url: String,
    shared: Arc<Shared>,
    /// Epoch of the connection the control loop has taken ownership of.
    session_epoch: Option<u32>,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimBroker,
}

impl MqttAdapter {
    /// Nothing touches the network until the first `connect`.
    pub fn new(broker_url: &str) -> Self {
        Self {
            broker_url: broker_url.to_owned(),
            shared: Arc::new(Shared::new()),
            session_epoch: None,
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim: SimBroker::default(),
        }
    }

    pub fn broker_url(&self) -> &str {
        &self.broker_url
    }

    fn current_epoch(&self) -> u32 {
        self.shared.epoch.load(Ordering::Acquire)
    }

    fn broker_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Start (or keep waiting on) the background connection.
    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        if self.client.is_none() {
            let conf = MqttClientConfiguration {
                client_id: Some(client_id),
                reconnect_timeout: Some(core::time::Duration::from_secs(1)),
                ..Default::default()
            };
            let shared = self.shared.clone();
            let client = EspMqttClient::new_cb(&self.broker_url, &conf, move |event| {
                match event.payload() {
                    EventPayload::Connected(_) => shared.on_connected(),
                    EventPayload::Disconnected => shared.on_disconnected(),
                    EventPayload::Received { topic: Some(topic), .. } => shared.on_received(topic),
                    _ => {}
                }
            })
            .map_err(|e| {
                warn!("MQTT: client init failed: {:?}", e);
                SessionError::ClientInit
            })?;
            info!("MQTT: client started for {}", self.broker_url);
            self.client = Some(client);
        }

        if self.broker_connected() {
            Ok(())
        } else {
            Err(SessionError::ConnectFailed)
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        if !self.sim.reachable {
            return Err(SessionError::ConnectFailed);
        }
        info!("MQTT(sim): {} connected to {}", client_id, self.broker_url);
        self.shared.on_connected();
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        let client = self.client.as_mut().ok_or(SessionError::NotConnected)?;
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| SessionError::SubscribeFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        self.sim.subscriptions.push(topic.to_owned());
        Ok(())
    }

    /// Queue the message in the client outbox; never waits on the socket.
    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), SessionError> {
        let client = self.client.as_mut().ok_or(SessionError::NotConnected)?;
        client
            .enqueue(topic, QoS::AtMostOnce, false, payload.as_bytes())
            .map(|_| ())
            .map_err(|_| SessionError::PublishFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), SessionError> {
        info!("MQTT(sim): {} <- {}", topic, payload);
        self.sim.published.push((topic.to_owned(), payload.to_owned()));
        Ok(())
    }

    // ── Simulation controls ───────────────────────────────────

    /// Simulation: make subsequent connect attempts succeed or fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_reachable(&mut self, reachable: bool) {
        self.sim.reachable = reachable;
    }

    /// Simulation: the broker drops the connection.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop(&mut self) {
        self.shared.on_disconnected();
    }

    /// Simulation: deliver a message as the client task would.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_deliver(&self, topic: &str) {
        self.shared.on_received(topic);
    }

    /// Simulation: everything published so far, oldest first.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> &[(String, String)] {
        &self.sim.published
    }

    /// Simulation: topics subscribed so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_subscriptions(&self) -> &[String] {
        &self.sim.subscriptions
    }
}

// ───────────────────────────────────────────────────────────────
// SessionPort
// ───────────────────────────────────────────────────────────────

impl SessionPort for MqttAdapter {
    fn connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        self.platform_connect(client_id)?;
        self.session_epoch = Some(self.current_epoch());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.broker_connected() && self.session_epoch == Some(self.current_epoch())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        self.platform_subscribe(topic)
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        self.platform_publish(topic, payload)
    }

    fn service(&mut self) {
        if self.session_epoch.is_some() && !self.is_connected() {
            warn!("MQTT: connection lost");
            self.session_epoch = None;
        }
    }

    fn take_inbound(&mut self) -> Option<InboundMessage> {
        self.shared.inbound.try_receive().ok()
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug)]
struct SimBroker {
    reachable: bool,
    subscriptions: Vec<String>,
    published: Vec<(String, String)>,
}

#[cfg(not(target_os = "espidf"))]
impl Default for SimBroker {
    fn default() -> Self {
        Self {
            reachable: true,
            subscriptions: Vec::new(),
            published: Vec::new(),
        }
    }
}
