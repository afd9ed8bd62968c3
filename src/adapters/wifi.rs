//! WiFi station-mode adapter.
//!
//! Implements [`LinkPort`] — the hexagonal boundary for network
//! association.  The adapter never waits: `begin` only kicks off
//! association, and the result shows up in later `status` polls.  Retry
//! timing belongs to the [`LinkManager`](crate::link::LinkManager), so the
//! driver's own auto-reconnect is left off and credentials are not
//! persisted to NVS.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::{info, warn};

use crate::app::ports::{LinkError, LinkPort, LinkStatus};
use crate::error::Result;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::EspWifi;

use super::utils::is_printable_ascii;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn validate_ssid(ssid: &str) -> core::result::Result<(), LinkError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(LinkError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> core::result::Result<(), LinkError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(LinkError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Status mapping
// ───────────────────────────────────────────────────────────────

/// Raw driver observations for one status poll.
#[derive(Debug, Clone, Copy, Default)]
struct RadioState {
    started: bool,
    associated: bool,
    ip_up: bool,
}

/// Collapse driver flags into a [`LinkStatus`].
///
/// `attempting` is true from `begin` until the next `disconnect`;
/// `was_connected` is true once this attempt has reached `Connected`.
fn classify(radio: RadioState, attempting: bool, was_connected: bool) -> LinkStatus {
    match (radio.started, radio.associated, radio.ip_up) {
        (true, true, true) => LinkStatus::Connected,
        // Associated but DHCP not finished yet.
        (true, true, false) => LinkStatus::Idle,
        _ if was_connected => LinkStatus::ConnectionLost,
        (true, false, _) if attempting => LinkStatus::Idle,
        _ => LinkStatus::Disconnected,
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    attempting: bool,
    was_connected: bool,
    #[cfg(target_os = "espidf")]
    driver: EspWifi<'static>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimRadio,
}

impl WifiAdapter {
    /// Wrap an initialised (not yet started) driver and load the station
    /// configuration into it.
    #[cfg(target_os = "espidf")]
    pub fn new(mut driver: EspWifi<'static>, ssid: &str, password: &str) -> Result<Self> {
        use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        validate_ssid(ssid)?;
        validate_password(password)?;

        let client = ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| LinkError::InvalidSsid)?,
            password: password.try_into().map_err(|_| LinkError::InvalidPassword)?,
            auth_method: if password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        };
        driver
            .set_configuration(&Configuration::Client(client))
            .map_err(|e| {
                warn!("WiFi: set_configuration failed: {:?}", e);
                LinkError::DriverFailed
            })?;

        Ok(Self {
            ssid: copy_str(ssid),
            attempting: false,
            was_connected: false,
            driver,
        })
    }

    /// Simulation: an in-memory radio that associates one poll after `begin`.
    /// The password is validated but never used.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(ssid: &str, password: &str) -> Result<Self> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        Ok(Self {
            ssid: copy_str(ssid),
            attempting: false,
            was_connected: false,
            sim: SimRadio::default(),
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_state(&mut self) -> RadioState {
        RadioState {
            started: self.driver.is_started().unwrap_or(false),
            associated: self.driver.is_connected().unwrap_or(false),
            ip_up: self.driver.is_up().unwrap_or(false),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_state(&mut self) -> RadioState {
        self.sim.poll()
    }

    #[cfg(target_os = "espidf")]
    fn platform_begin(&mut self) {
        if !self.driver.is_started().unwrap_or(false) {
            if let Err(e) = self.driver.start() {
                warn!("WiFi: start failed: {:?}", e);
                return;
            }
            // Power save off: modem sleep adds latency to every publish.
            // SAFETY: the WiFi driver is initialised and started above.
            let ret = unsafe {
                esp_idf_svc::sys::esp_wifi_set_ps(esp_idf_svc::sys::wifi_ps_type_t_WIFI_PS_NONE)
            };
            if ret != esp_idf_svc::sys::ESP_OK {
                warn!("WiFi: disabling power save failed ({})", ret);
            }
        }
        if let Err(e) = self.driver.connect() {
            warn!("WiFi: connect request failed: {:?}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin(&mut self) {
        self.sim.begin();
        info!("WiFi(sim): associating with '{}' (attempt {})", self.ssid, self.sim.attempts);
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        // Fails harmlessly when the driver is not started or not associated.
        let _ = self.driver.disconnect();
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.disconnect();
    }

    /// Simulation: drop the current association as if the AP vanished.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop(&mut self) {
        warn!("WiFi(sim): association dropped");
        self.sim.associated = false;
        self.sim.ip_up = false;
    }
}

fn copy_str<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    // Lengths are validated before this is called.
    let _ = out.push_str(s);
    out
}

// ───────────────────────────────────────────────────────────────
// LinkPort
// ───────────────────────────────────────────────────────────────

impl LinkPort for WifiAdapter {
    fn status(&mut self) -> LinkStatus {
        let status = classify(self.platform_state(), self.attempting, self.was_connected);
        if status == LinkStatus::Connected {
            self.was_connected = true;
        }
        status
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.attempting = false;
        self.was_connected = false;
    }

    fn begin(&mut self) {
        info!("WiFi: connecting to '{}'", self.ssid);
        self.platform_begin();
        self.attempting = true;
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimRadio {
    started: bool,
    associated: bool,
    ip_up: bool,
    /// Association completes on the next poll.
    pending: bool,
    attempts: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimRadio {
    fn begin(&mut self) {
        self.started = true;
        self.attempts = self.attempts.wrapping_add(1);
        // Every 4th attempt finds no AP, to exercise the retry cool-down.
        self.pending = self.attempts % 4 != 0;
    }

    fn disconnect(&mut self) {
        self.associated = false;
        self.ip_up = false;
        self.pending = false;
    }

    fn poll(&mut self) -> RadioState {
        if self.pending {
            self.pending = false;
            self.associated = true;
            self.ip_up = true;
        }
        RadioState {
            started: self.started,
            associated: self.associated,
            ip_up: self.ip_up,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
