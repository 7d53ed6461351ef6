//! Timing configuration for the button service

use embassy_time::Duration;

/// Global debounce window shared by every button.
pub const MIN_DURATION_BETWEEN_PRESSES: Duration = Duration::from_millis(500);

/// How long the clock button must be held before the clock starts advancing.
pub const DURATION_HOLD_FOR_CLOCK_SET: Duration = Duration::from_millis(1500);

/// Pause between two iterations of the consumer loop.
pub const DURATION_SLEEP_DURING_LOOP: Duration = Duration::from_millis(200);

/// Depth of the event queue between the inputs and the controller.
pub const EVENT_QUEUE_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Struct representing the timing configuration of the button service.
pub struct Config {
    /// Presses closer than this to the last accepted press are ignored
    pub min_press_interval: Duration,
    /// Above this hold time, a held clock button requests clock advance on every tick
    pub clock_set_hold: Duration,
    /// Sleep performed by each call to `Controller::update`
    pub loop_interval: Duration,
}

impl Config {
    /// Creates a new Config instance with the given timings.
    pub fn new(min_press_interval: Duration, clock_set_hold: Duration, loop_interval: Duration) -> Self {
        Self {
            min_press_interval,
            clock_set_hold,
            loop_interval,
        }
    }
}

/// Default Config with a 500ms debounce window, 1.5s clock hold and 200ms loop.
impl Default for Config {
    fn default() -> Self {
        Self {
            min_press_interval: MIN_DURATION_BETWEEN_PRESSES,
            clock_set_hold: DURATION_HOLD_FOR_CLOCK_SET,
            loop_interval: DURATION_SLEEP_DURING_LOOP,
        }
    }
}
