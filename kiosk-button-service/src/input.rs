//! Digital input adapter for the kiosk buttons

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal_1::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::config::DURATION_SLEEP_DURING_LOOP;
use crate::error::Error;
use crate::event::{ButtonEvents, ButtonId, Event};
use crate::fmt::{error, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing if the button is active low or active high.
pub enum ActiveState {
    /// Button pulls the line to ground when pressed.
    #[default]
    ActiveLow,
    /// Button drives the line high when pressed.
    ActiveHigh,
}

#[derive(Debug)]
/// A struct representing a button on a generic GPIO pin.
pub struct Input<I> {
    gpio: I,
    active_state: ActiveState,
}

impl<I: InputPin> Input<I> {
    /// Creates a new `Input` instance with the given GPIO pin.
    pub fn new(gpio: I, active_state: ActiveState) -> Self {
        Self { gpio, active_state }
    }

    /// Returns true while the button is held down.
    ///
    /// A pin that cannot be read is reported as not pressed.
    pub fn is_pressed(&mut self) -> bool {
        let level = match self.active_state {
            ActiveState::ActiveLow => self.gpio.is_low(),
            ActiveState::ActiveHigh => self.gpio.is_high(),
        };

        level.unwrap_or_else(|_| {
            warn!("Failed to read button level");
            false
        })
    }
}

impl<I: InputPin + Wait> Input<I> {
    /// Waits for the button to go down.
    pub async fn wait_for_press(&mut self) -> Result<(), Error> {
        match self.active_state {
            ActiveState::ActiveLow => self.gpio.wait_for_falling_edge().await,
            ActiveState::ActiveHigh => self.gpio.wait_for_rising_edge().await,
        }
        .map_err(|_| Error::Pin)
    }

    /// Waits for the button to come back up.
    pub async fn wait_for_release(&mut self) -> Result<(), Error> {
        match self.active_state {
            ActiveState::ActiveLow => self.gpio.wait_for_rising_edge().await,
            ActiveState::ActiveHigh => self.gpio.wait_for_falling_edge().await,
        }
        .map_err(|_| Error::Pin)
    }
}

/// Turns the edges of one button into timestamped events.
pub struct Watcher<'a, I> {
    button: ButtonId,
    input: &'a mut Input<I>,
    pressed: bool,
}

impl<'a, I: InputPin + Wait> Watcher<'a, I> {
    /// Creates a watcher for `button`, assuming it starts released.
    pub fn new(button: ButtonId, input: &'a mut Input<I>) -> Self {
        Self {
            button,
            input,
            pressed: false,
        }
    }

    /// Waits for the next edge: a press while released, a release while pressed.
    ///
    /// The level is checked first, so an edge missed while the caller was busy is
    /// reported at once instead of desynchronising the watcher.
    pub async fn next(&mut self) -> Result<Event, Error> {
        if self.input.is_pressed() == self.pressed {
            if self.pressed {
                self.input.wait_for_release().await?;
            } else {
                self.input.wait_for_press().await?;
            }
        } else {
            trace!("Missed {:?} edge, resyncing", self.button);
        }

        self.pressed = !self.pressed;
        let now = Instant::now();
        Ok(if self.pressed {
            Event::pressed(self.button, now)
        } else {
            Event::released(self.button, now)
        })
    }
}

/// Pause before waiting on a pin again after it reported an error.
pub const PIN_RETRY_INTERVAL: Duration = DURATION_SLEEP_DURING_LOOP;

/// Forwards every edge of `input` to `events`, forever.
pub async fn watch<I: InputPin + Wait, M: RawMutex, const N: usize>(
    button: ButtonId,
    input: &mut Input<I>,
    events: ButtonEvents<'_, M, N>,
) -> ! {
    let mut watcher = Watcher::new(button, input);

    loop {
        match watcher.next().await {
            Ok(event) => {
                trace!("{:?} {:?}", event.button, event.edge);
                events.send(event).await;
            }
            Err(e) => {
                error!("Error waiting on {:?} button: {:?}", button, e);
                Timer::after(PIN_RETRY_INTERVAL).await;
            }
        }
    }
}
