//! Device identity.
//!
//! The identity is derived once at startup from the factory MAC address and
//! never changes.  It is used as the MQTT client id and as the payload of
//! the announce and poll-reply messages.
//!
//! Format: `fridge-door-sensor_` followed by the 48-bit MAC read as a
//! little-endian integer, in lowercase hex without leading zeros
//! (e.g. `fridge-door-sensor_fecaefbeadde`).

use core::fmt::{self, Write};

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Stable prefix shared by every unit.
pub const IDENTITY_PREFIX: &str = "fridge-door-sensor_";

/// Prefix (19) + up to 12 hex digits.
pub type IdentityString = heapless::String<32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(IdentityString);

impl Identity {
    /// Derive the identity from the factory MAC.
    pub fn from_mac(mac: &MacAddress) -> Self {
        let mut raw = [0u8; 8];
        raw[..6].copy_from_slice(mac);
        let value = u64::from_le_bytes(raw);

        let mut s = IdentityString::new();
        // 19 + 12 always fits in 32.
        let _ = write!(s, "{}{:x}", IDENTITY_PREFIX, value);
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
