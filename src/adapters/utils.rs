//! Small helpers shared by the adapters.

/// Returns `true` if every byte of `s` is in `0x20..=0x7E`.
///
/// The WiFi driver copies the SSID into a fixed C buffer and some access
/// points refuse control bytes, so station credentials are held to this.
pub(super) fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
