//! On-chip peripherals that sit outside the port/adapter boundary.

pub mod watchdog;
