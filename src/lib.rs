//! Fridge door sensor firmware library.
//!
//! Exposes the pure-logic modules for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, with host simulations alongside.

#![deny(unused_must_use)]

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod link;
pub mod session;
pub mod tracker;

pub mod pins;

pub mod adapters;
pub mod drivers;
pub mod sensors;
