//! Sensor drivers.
//!
//! The firmware has a single input: the door reed contact.

pub mod door;
