//! Debounce Module

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Struct representing a single press gate shared by every button.
///
/// A press on any button restarts the window for all of them.
pub struct PressGate {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl PressGate {
    /// Creates a new PressGate that has not accepted any press yet.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    /// Returns true if a press at `now` falls inside the debounce window.
    ///
    /// When the press is accepted, `now` becomes the new reference point of the window.
    /// A timestamp older than the last accepted press is always rejected.
    pub fn is_press_too_soon(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now < last || now.saturating_duration_since(last) < self.min_interval {
                return true;
            }
        }

        self.last_accepted = Some(now);
        false
    }

    /// Time elapsed between the last accepted press and `now`.
    pub fn elapsed_since_accepted(&self, now: Instant) -> Option<Duration> {
        self.last_accepted.map(|last| now.saturating_duration_since(last))
    }

    /// Timestamp of the last accepted press, if any.
    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }
}

/// Default PressGate with a 500ms window.
impl Default for PressGate {
    fn default() -> Self {
        Self::new(crate::config::MIN_DURATION_BETWEEN_PRESSES)
    }
}
