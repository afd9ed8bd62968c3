//! Magnetic reed contact on the door.
//!
//! The contact pulls the GPIO HIGH while the door is shut (magnet present);
//! the pin is configured with an internal pull-down, so an open door reads
//! LOW.  Any [`embedded_hal::digital::InputPin`] works, which keeps the
//! driver usable with the ESP-IDF `PinDriver` on target and with a
//! simulated pin on the host.
//!
//! No contact-bounce filtering is done here; the tracker only measures
//! how long the door stays open.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{Error as _, InputPin};
use log::warn;

use crate::app::ports::DoorInputPort;

pub struct DoorContact<P> {
    pin: P,
    /// Last good reading, reused if the GPIO read fails.
    last_closed: bool,
}

impl<P: InputPin> DoorContact<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_closed: true,
        }
    }
}

impl<P: InputPin> DoorInputPort for DoorContact<P> {
    fn contact_closed(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(closed) => self.last_closed = closed,
            Err(e) => warn!("door GPIO read failed ({:?}), keeping last level", e.kind()),
        }
        self.last_closed
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_CONTACT_CLOSED: AtomicBool = AtomicBool::new(true);

/// Simulation: drive the level seen by every [`SimDoorPin`].
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_door_open(open: bool) {
    SIM_CONTACT_CLOSED.store(!open, Ordering::Relaxed);
}

/// Simulated door GPIO for host builds.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimDoorPin;

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimDoorPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl InputPin for SimDoorPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(SIM_CONTACT_CLOSED.load(Ordering::Relaxed))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!SIM_CONTACT_CLOSED.load(Ordering::Relaxed))
    }
}
