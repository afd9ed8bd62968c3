//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the door tracker, the WiFi Link Manager, and the MQTT
//! Session Manager into one per-tick control step.  All interaction with
//! hardware and the network happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without a radio or broker.

pub mod events;
pub mod ports;
pub mod service;
