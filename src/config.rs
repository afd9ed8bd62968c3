//! System configuration
//!
//! Site parameters (WiFi network, MQTT broker, reporting topic) are baked in
//! at build time: `build.rs` embeds `config.json` from the crate root, or the
//! checked-in `config.json.example` template when no site file exists.
//! There is no runtime configuration and nothing is persisted.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration artifact selected by `build.rs`.
const EMBEDDED_CONFIG: &str = include_str!(env!("DOORSENSOR_CONFIG"));

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub wifi: WifiConfig,
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Wireless network credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: String,
    /// Empty for an open network.
    #[serde(default)]
    pub password: String,
}

/// MQTT broker and reporting topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub hostname: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    /// Topic that receives the open duration in whole seconds.
    pub topic: String,
}

/// Retry and heartbeat periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Minimum gap between WiFi association attempts (seconds)
    pub link_retry_secs: u32,
    /// Minimum gap between MQTT connect attempts (seconds)
    pub session_retry_secs: u32,
    /// Re-publish the unchanged value after this long (seconds)
    pub heartbeat_secs: u32,
}

fn default_mqtt_port() -> u16 {
    1883
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            link_retry_secs: 30,
            session_retry_secs: 1,
            heartbeat_secs: 60,
        }
    }
}

impl TimingConfig {
    pub fn link_retry(&self) -> Duration {
        Duration::from_secs(self.link_retry_secs as u64)
    }

    pub fn session_retry(&self) -> Duration {
        Duration::from_secs(self.session_retry_secs as u64)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs as u64)
    }
}

// ───────────────────────────────────────────────────────────────
// Loading and validation
// ───────────────────────────────────────────────────────────────

/// Errors from parsing or validating a configuration artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The artifact is not valid JSON or is missing required fields.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}

impl SystemConfig {
    /// Parse and validate the configuration baked in at build time.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(EMBEDDED_CONFIG)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::error!("config parse error: {}", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the firmware cannot run with.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ssid = self.wifi.ssid.as_str();
        if ssid.is_empty() || ssid.len() > 32 {
            return Err(ConfigError::ValidationFailed("wifi.ssid must be 1-32 bytes"));
        }
        if !ssid.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return Err(ConfigError::ValidationFailed("wifi.ssid must be printable ASCII"));
        }
        let pass_len = self.wifi.password.len();
        if pass_len != 0 && !(8..=64).contains(&pass_len) {
            return Err(ConfigError::ValidationFailed(
                "wifi.password must be empty or 8-64 bytes",
            ));
        }

        if self.mqtt.hostname.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("mqtt.hostname is empty"));
        }
        if self.mqtt.port == 0 {
            return Err(ConfigError::ValidationFailed("mqtt.port must be non-zero"));
        }
        if self.mqtt.topic.is_empty() {
            return Err(ConfigError::ValidationFailed("mqtt.topic is empty"));
        }
        if self.mqtt.topic.contains(['+', '#']) {
            return Err(ConfigError::ValidationFailed(
                "mqtt.topic must not contain wildcards",
            ));
        }

        let t = &self.timing;
        if t.link_retry_secs == 0 || t.session_retry_secs == 0 || t.heartbeat_secs == 0 {
            return Err(ConfigError::ValidationFailed("timing values must be non-zero"));
        }
        Ok(())
    }

    /// Broker URL in the form the ESP-IDF MQTT client expects.
    pub fn broker_url(&self) -> String {
        format!("mqtt://{}:{}", self.mqtt.hostname, self.mqtt.port)
    }
}
