//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to              |
//! |-------------|--------------|--------------------------|
//! | `device_id` | —            | eFuse factory MAC        |
//! | `log_sink`  | EventSink    | Serial log output        |
//! | `mqtt`      | SessionPort  | ESP-IDF MQTT client      |
//! | `time`      | ClockPort    | ESP32 system timer       |
//! | `wifi`      | LinkPort     | ESP-IDF WiFi STA         |

pub mod device_id;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub(super) mod utils;
pub mod wifi;
