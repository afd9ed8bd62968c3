//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the door monitor against
//! mock or simulated adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

#![cfg(not(target_os = "espidf"))]

mod monitor_scenarios;
mod reporting_tests;
mod sim_adapter_tests;
