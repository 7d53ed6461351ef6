//! Button events and the queue carrying them to the controller

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::Instant;

use crate::config::EVENT_QUEUE_DEPTH;
use crate::error::Error;
use crate::fmt::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing the physical buttons of the kiosk.
pub enum ButtonId {
    /// Toggles the display between off and video.
    Power,
    /// Starts video playback, or skips to the next video while playing.
    Video,
    /// Enters clock setting, hold to advance the clock.
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing a transition of a button.
pub enum Edge {
    /// The button went down.
    Pressed,
    /// The button came back up.
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A button transition and the time it was observed.
pub struct Event {
    /// Button that changed
    pub button: ButtonId,
    /// Direction of the change
    pub edge: Edge,
    /// When the edge was seen by the input source
    pub at: Instant,
}

impl Event {
    /// Press of `button` observed at `at`.
    pub fn pressed(button: ButtonId, at: Instant) -> Self {
        Self {
            button,
            edge: Edge::Pressed,
            at,
        }
    }

    /// Release of `button` observed at `at`.
    pub fn released(button: ButtonId, at: Instant) -> Self {
        Self {
            button,
            edge: Edge::Released,
            at,
        }
    }
}

/// Queue between the input sources and the controller.
pub type EventQueue<M, const N: usize = EVENT_QUEUE_DEPTH> = Channel<M, Event, N>;

/// Callback-side handle feeding button edges into the event queue.
///
/// Cheap to copy, one per input context.
pub struct ButtonEvents<'a, M: RawMutex, const N: usize = EVENT_QUEUE_DEPTH> {
    sender: Sender<'a, M, Event, N>,
}

impl<M: RawMutex, const N: usize> Clone for ButtonEvents<'_, M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, const N: usize> Copy for ButtonEvents<'_, M, N> {}

impl<'a, M: RawMutex, const N: usize> ButtonEvents<'a, M, N> {
    /// Creates a handle sending into `queue`.
    pub fn new(queue: &'a EventQueue<M, N>) -> Self {
        Self {
            sender: queue.sender(),
        }
    }

    /// Records a press of `button`, without blocking.
    pub fn on_pressed(&self, button: ButtonId) -> Result<(), Error> {
        self.try_send(Event::pressed(button, Instant::now()))
    }

    /// Records a release of `button`, without blocking.
    pub fn on_released(&self, button: ButtonId) -> Result<(), Error> {
        self.try_send(Event::released(button, Instant::now()))
    }

    /// Queues `event`, dropping it if the queue is full.
    pub fn try_send(&self, event: Event) -> Result<(), Error> {
        self.sender.try_send(event).map_err(|_| {
            warn!("Event queue full, dropping {:?}", event);
            Error::QueueFull
        })
    }

    /// Queues `event`, waiting for room if the queue is full.
    pub async fn send(&self, event: Event) {
        self.sender.send(event).await
    }
}
