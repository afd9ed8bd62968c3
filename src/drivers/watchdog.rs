//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the board if the monitor loop stops ticking.  Nothing in a tick
//! blocks for long (WiFi association and the MQTT handshake both run in
//! the background), so a stall here means the firmware is wedged.
//!
//! The main loop calls `feed()` once per tick.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;
use log::info;

/// Time without a `feed()` before the TWDT panics the chip.
pub const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Configure the TWDT and subscribe the calling task.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: WATCHDOG_TIMEOUT_MS,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: `cfg` outlives the call; the TWDT copies it.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK {
            warn!("Watchdog: reconfigure returned {} (may already be configured)", ret);
        }

        // SAFETY: a null handle subscribes the current task.
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK;
        if subscribed {
            info!("Watchdog: subscribed ({}ms timeout)", WATCHDOG_TIMEOUT_MS);
        } else {
            warn!("Watchdog: failed to subscribe ({})", ret);
        }
        Self { subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        info!("Watchdog(sim): no-op");
        Self { subscribed: false }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: only reached after a successful `esp_task_wdt_add`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
