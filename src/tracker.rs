//! Door open-duration tracker.
//!
//! Turns the instantaneous contact reading into "how long has the door
//! been open", in whole seconds.
//!
//! ```text
//!            contact released                 contact closed
//!   Closed ────────────────────▶ Open ────────────────────────▶ Closed
//!   duration = 0            opened_at = now          duration = 0
//!                           duration = ⌊now − opened_at⌋
//! ```
//!
//! The open timestamp lives in RAM only; after a reset the duration starts
//! again from zero even if the door is still open.

use core::time::Duration;

use crate::clock::Timestamp;

/// Edge seen by the most recent [`SensorTracker::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorTransition {
    Opened,
    /// Carries how long the door had been open.
    Closed(Duration),
}

#[derive(Debug, Clone, Default)]
pub struct SensorTracker {
    is_open: bool,
    opened_at: Timestamp,
    open_duration: Duration,
}

impl SensorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample.  Returns the edge, if this sample crossed one.
    pub fn update(&mut self, contact_closed: bool, now: Timestamp) -> Option<DoorTransition> {
        if !contact_closed {
            let opened = !self.is_open;
            if opened {
                self.is_open = true;
                self.opened_at = now;
            }
            // Floor to whole seconds so repeated samples within one second
            // report the same value.
            self.open_duration = Duration::from_secs(now.duration_since(self.opened_at).as_secs());
            opened.then_some(DoorTransition::Opened)
        } else if self.is_open {
            let was_open_for = self.open_duration;
            self.is_open = false;
            self.open_duration = Duration::ZERO;
            Some(DoorTransition::Closed(was_open_for))
        } else {
            None
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// When the current opening started.  `None` while closed.
    pub fn opened_at(&self) -> Option<Timestamp> {
        self.is_open.then_some(self.opened_at)
    }

    /// Whole seconds the door has been open; zero while closed.
    pub fn open_duration(&self) -> Duration {
        self.open_duration
    }

    pub fn open_secs(&self) -> u64 {
        self.open_duration.as_secs()
    }
}
