//! Controller polled by the render loop
//!
//! The controller is the single owner of the [`ButtonStateMachine`]. Input contexts
//! only hold a [`ButtonEvents`](crate::event::ButtonEvents) sender, their events are
//! applied here, in order, on every tick.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Instant, Timer};
use embedded_hal_1::digital::InputPin;

use crate::config::{Config, EVENT_QUEUE_DEPTH};
use crate::event::{Event, EventQueue};
use crate::fmt::debug;
use crate::input::Input;
use crate::state::{ButtonStateMachine, Status};

/// Owner of the session state, driven by the consumer loop.
pub struct Controller<'a, M: RawMutex, L: InputPin, const N: usize = EVENT_QUEUE_DEPTH> {
    machine: ButtonStateMachine,
    receiver: Receiver<'a, M, Event, N>,
    clock: Input<L>,
    last_status: Status,
}

impl<'a, M: RawMutex, L: InputPin, const N: usize> Controller<'a, M, L, N> {
    /// Creates a controller draining `queue`, reading the clock button level from `clock`.
    pub fn new(config: Config, queue: &'a EventQueue<M, N>, clock: Input<L>) -> Self {
        let machine = ButtonStateMachine::new(config);
        let last_status = machine.status();

        Self {
            machine,
            receiver: queue.receiver(),
            clock,
            last_status,
        }
    }

    /// Applies every queued event, then runs hold detection at `now`.
    pub fn poll(&mut self, now: Instant) {
        while let Ok(event) = self.receiver.try_receive() {
            self.machine.handle_event(event);
        }

        let clock_held = self.clock.is_pressed();
        self.machine.tick(now, clock_held);
    }

    /// One iteration of the consumer loop: poll, then sleep for the loop interval.
    pub async fn update(&mut self) {
        self.poll(Instant::now());

        let status = self.machine.status();
        if status != self.last_status {
            debug!("{:?}", status);
            self.last_status = status;
        }

        Timer::after(self.machine.config().loop_interval).await;
    }

    /// Video should be playing.
    pub fn should_video_be_playing(&self) -> bool {
        self.machine.should_video_be_playing()
    }

    /// Consumes a pending video advance.
    pub fn should_video_advance(&mut self) -> bool {
        self.machine.should_video_advance()
    }

    /// The clock should be shown.
    pub fn should_clock_be_playing(&self) -> bool {
        self.machine.should_clock_be_playing()
    }

    /// The clock should advance on this frame.
    pub fn should_clock_advance(&self) -> bool {
        self.machine.should_clock_advance()
    }

    /// Snapshot of the session state.
    pub fn status(&self) -> Status {
        self.machine.status()
    }
}
