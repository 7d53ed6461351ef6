//! Button state machine
//!
//! Owns the session state of the kiosk: the current [`Mode`], the pending advance
//! requests and the debounce gate shared by every button. All timing is driven by
//! the timestamps passed in, which keeps the machine independent of the time driver.

use embassy_time::Instant;

use crate::config::Config;
use crate::debounce::PressGate;
use crate::event::{ButtonId, Edge, Event};
use crate::fmt::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing which subsystem should currently be rendering.
pub enum Mode {
    /// Display is off.
    #[default]
    Off,
    /// Videos are playing.
    Video,
    /// The clock is shown and can be set.
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Snapshot of the session state, for diagnostics.
pub struct Status {
    /// Current mode
    pub mode: Mode,
    /// A video advance is waiting to be consumed
    pub video_advance_pending: bool,
    /// The clock is being advanced
    pub clock_advance_pending: bool,
    /// Last press accepted by the debounce gate
    pub last_accepted_press: Option<Instant>,
}

#[derive(Debug)]
/// The session state and the rules applied to it.
pub struct ButtonStateMachine {
    config: Config,
    mode: Mode,
    video_advance_pending: bool,
    clock_advance_pending: bool,
    gate: PressGate,
}

impl ButtonStateMachine {
    /// Creates a new state machine in [`Mode::Off`].
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mode: Mode::Off,
            video_advance_pending: false,
            clock_advance_pending: false,
            gate: PressGate::new(config.min_press_interval),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a snapshot of the session state without consuming anything.
    pub fn status(&self) -> Status {
        Status {
            mode: self.mode,
            video_advance_pending: self.video_advance_pending,
            clock_advance_pending: self.clock_advance_pending,
            last_accepted_press: self.gate.last_accepted(),
        }
    }

    /// Applies a queued button event.
    pub fn handle_event(&mut self, event: Event) {
        match (event.button, event.edge) {
            (ButtonId::Power, Edge::Pressed) => self.on_press_power(event.at),
            (ButtonId::Video, Edge::Pressed) => self.on_press_video(event.at),
            (ButtonId::Clock, Edge::Pressed) => self.on_press_clock(event.at),
            (ButtonId::Clock, Edge::Released) => self.on_release_clock(),
            (button, Edge::Released) => trace!("{:?} released", button),
        }
    }

    /// Power button toggles between off and video.
    pub fn on_press_power(&mut self, now: Instant) {
        if self.is_press_too_soon(ButtonId::Power, now) {
            return;
        }

        match self.mode {
            Mode::Off => self.set_mode(Mode::Video),
            Mode::Video | Mode::Clock => self.set_mode(Mode::Off),
        }
    }

    /// Video button starts playback, or requests the next video while playing.
    pub fn on_press_video(&mut self, now: Instant) {
        if self.is_press_too_soon(ButtonId::Video, now) {
            return;
        }

        if self.mode == Mode::Video {
            debug!("Video advance requested");
            self.video_advance_pending = true;
        } else {
            self.set_mode(Mode::Video);
            self.video_advance_pending = false;
        }
        self.check_invariants();
    }

    /// Clock button enters clock setting from any mode.
    pub fn on_press_clock(&mut self, now: Instant) {
        if self.is_press_too_soon(ButtonId::Clock, now) {
            return;
        }

        self.set_mode(Mode::Clock);
        self.clock_advance_pending = false;
    }

    /// Releasing the clock button stops any clock advance immediately.
    pub fn on_release_clock(&mut self) {
        if self.clock_advance_pending {
            debug!("Clock advance stopped");
        }
        self.clock_advance_pending = false;
    }

    /// Periodic hold detection.
    ///
    /// `clock_held` is the current level of the clock button. Once it has been held for
    /// longer than the configured hold time since the last accepted press, clock advance
    /// stays requested on every tick until release. A button seen up here stops the
    /// advance even if its release event was lost.
    pub fn tick(&mut self, now: Instant, clock_held: bool) {
        if !clock_held {
            self.on_release_clock();
            return;
        }

        if self.mode != Mode::Clock {
            return;
        }

        let held_long_enough = self
            .gate
            .elapsed_since_accepted(now)
            .is_some_and(|elapsed| elapsed > self.config.clock_set_hold);

        if held_long_enough && !self.clock_advance_pending {
            debug!("Clock held, advancing");
            self.clock_advance_pending = true;
        }
        self.check_invariants();
    }

    /// Video should be playing.
    pub fn should_video_be_playing(&self) -> bool {
        self.mode == Mode::Video
    }

    /// Consumes a pending video advance, returns true at most once per request.
    pub fn should_video_advance(&mut self) -> bool {
        let advance = self.mode == Mode::Video && self.video_advance_pending;
        self.video_advance_pending = false;
        advance
    }

    /// The clock should be shown.
    pub fn should_clock_be_playing(&self) -> bool {
        self.mode == Mode::Clock
    }

    /// The clock should advance on this frame. Not consumed by reading.
    pub fn should_clock_advance(&self) -> bool {
        self.mode == Mode::Clock && self.clock_advance_pending
    }

    fn is_press_too_soon(&mut self, button: ButtonId, now: Instant) -> bool {
        let too_soon = self.gate.is_press_too_soon(now);
        if too_soon {
            trace!("Ignoring {:?} press at {:?}, too soon", button, now);
        }
        too_soon
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }

        info!("Mode {:?} -> {:?}", self.mode, mode);
        match self.mode {
            Mode::Video => self.video_advance_pending = false,
            Mode::Clock => self.clock_advance_pending = false,
            Mode::Off => {}
        }
        self.mode = mode;
        self.check_invariants();
    }

    fn check_invariants(&self) {
        debug_assert!(
            !self.video_advance_pending || self.mode == Mode::Video,
            "video advance pending outside of video mode"
        );
        debug_assert!(
            !self.clock_advance_pending || self.mode == Mode::Clock,
            "clock advance pending outside of clock mode"
        );
    }
}

impl Default for ButtonStateMachine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_initial_state() {
        let machine = ButtonStateMachine::default();
        assert_eq!(machine.mode(), Mode::Off);
        assert!(!machine.should_video_be_playing());
        assert!(!machine.should_clock_be_playing());
        assert!(!machine.should_clock_advance());
        assert_eq!(machine.status().last_accepted_press, None);
    }

    #[test]
    fn test_power_toggle() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_power(at(0));
        assert_eq!(machine.mode(), Mode::Video);
        assert!(machine.should_video_be_playing());

        machine.on_press_power(at(1000));
        assert_eq!(machine.mode(), Mode::Off);
        assert!(!machine.should_video_be_playing());
    }

    #[test]
    fn test_power_from_clock_turns_off() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_clock(at(0));
        assert_eq!(machine.mode(), Mode::Clock);
        machine.on_press_power(at(1000));
        assert_eq!(machine.mode(), Mode::Off);
    }

    #[test]
    fn test_debounce_scenario() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_power(at(0));
        assert_eq!(machine.mode(), Mode::Video);

        // Suppressed, stays in video
        machine.on_press_power(at(100));
        assert_eq!(machine.mode(), Mode::Video);

        machine.on_press_power(at(600));
        assert_eq!(machine.mode(), Mode::Off);
    }

    #[test]
    fn test_debounce_is_shared_between_buttons() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_power(at(0));
        machine.on_press_clock(at(200));
        machine.on_press_video(at(400));
        assert_eq!(machine.mode(), Mode::Video);
        assert!(!machine.should_video_advance());
        assert_eq!(machine.status().last_accepted_press, Some(at(0)));

        machine.on_press_clock(at(500));
        assert_eq!(machine.mode(), Mode::Clock);
    }

    #[test]
    fn test_video_advance_is_one_shot() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_video(at(0));
        machine.on_press_video(at(1000));
        assert!(machine.should_video_advance());
        assert!(!machine.should_video_advance());
        assert!(!machine.should_video_advance());

        machine.on_press_video(at(2000));
        assert!(machine.should_video_advance());
        assert!(!machine.should_video_advance());
    }

    #[test]
    fn test_entering_video_does_not_advance() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_video(at(0));
        assert_eq!(machine.mode(), Mode::Video);
        assert!(!machine.should_video_advance());
    }

    #[test]
    fn test_leaving_video_drops_pending_advance() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_video(at(0));
        machine.on_press_video(at(1000));
        machine.on_press_power(at(2000));
        assert!(!machine.status().video_advance_pending);

        machine.on_press_power(at(3000));
        assert_eq!(machine.mode(), Mode::Video);
        assert!(!machine.should_video_advance());
    }

    #[test]
    fn test_clock_entry_from_any_mode() {
        for setup in [&[][..], &[ButtonId::Power][..], &[ButtonId::Clock][..]] {
            let mut machine = ButtonStateMachine::default();
            let mut t = 0;
            for button in setup {
                machine.handle_event(Event::pressed(*button, at(t)));
                t += 1000;
            }

            machine.on_press_clock(at(t));
            assert_eq!(machine.mode(), Mode::Clock);
            assert!(machine.should_clock_be_playing());
            assert!(!machine.should_clock_advance());
        }
    }

    #[test]
    fn test_clock_hold_to_advance() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_clock(at(0));
        machine.tick(at(200), true);
        machine.tick(at(1400), true);
        assert!(!machine.should_clock_advance());

        // Exactly at the threshold is not enough
        machine.tick(at(1500), true);
        assert!(!machine.should_clock_advance());

        machine.tick(at(1600), true);
        assert!(machine.should_clock_advance());
        // Reading does not consume it
        assert!(machine.should_clock_advance());

        machine.tick(at(1800), true);
        assert!(machine.should_clock_advance());

        machine.on_release_clock();
        assert!(!machine.should_clock_advance());
        machine.tick(at(2000), false);
        assert!(!machine.should_clock_advance());
    }

    #[test]
    fn test_clock_release_before_hold() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_clock(at(0));
        machine.tick(at(1000), true);
        machine.handle_event(Event::released(ButtonId::Clock, at(1100)));
        machine.tick(at(2000), false);
        assert!(!machine.should_clock_advance());
        assert_eq!(machine.mode(), Mode::Clock);
    }

    #[test]
    fn test_hold_outside_clock_mode() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_power(at(0));
        // Clock press swallowed by the debounce gate, button stays held
        machine.on_press_clock(at(300));
        machine.tick(at(2000), true);
        assert_eq!(machine.mode(), Mode::Video);
        assert!(!machine.status().clock_advance_pending);
    }

    #[test]
    fn test_clock_repress_restarts_hold() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_clock(at(0));
        machine.tick(at(1600), true);
        assert!(machine.should_clock_advance());

        machine.on_release_clock();
        machine.on_press_clock(at(1800));
        machine.tick(at(2000), true);
        assert!(!machine.should_clock_advance());
        machine.tick(at(3400), true);
        assert!(machine.should_clock_advance());
    }

    #[test]
    fn test_leaving_clock_drops_pending_advance() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_clock(at(0));
        machine.tick(at(1600), true);
        machine.on_press_video(at(1700));
        assert_eq!(machine.mode(), Mode::Video);
        assert!(!machine.status().clock_advance_pending);
        assert!(!machine.should_clock_advance());
    }

    #[test]
    fn test_other_releases_ignored() {
        let mut machine = ButtonStateMachine::default();

        machine.on_press_video(at(0));
        machine.handle_event(Event::released(ButtonId::Video, at(100)));
        machine.handle_event(Event::released(ButtonId::Power, at(200)));
        assert_eq!(machine.mode(), Mode::Video);
        assert_eq!(machine.status().last_accepted_press, Some(at(0)));
    }
}
