//! Factory MAC access for the device identity.
//!
//! The MAC is burned into eFuse at the factory, so the derived
//! [`Identity`] is stable across reboots and unique per unit.

use crate::identity::{Identity, MacAddress};

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: `mac` is a valid 6-byte buffer, the size this call writes.
    let ret = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    if ret != esp_idf_svc::sys::ESP_OK {
        log::warn!("eFuse MAC read failed ({}), identity will not be unique", ret);
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Identity of this unit.
pub fn identity() -> Identity {
    Identity::from_mac(&read_mac())
}
