use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer};
use kiosk_button_service::input::{ActiveState, Input};
use kiosk_button_service::{ButtonEvents, ButtonId, Config, Controller, EventQueue};
use log::*;
use static_cell::StaticCell;

/// Queue shared by the simulated buttons and the render loop
static EVENTS: EventQueue<CriticalSectionRawMutex> = EventQueue::new();

static POWER_DOWN: AtomicBool = AtomicBool::new(false);
static VIDEO_DOWN: AtomicBool = AtomicBool::new(false);
static CLOCK_DOWN: AtomicBool = AtomicBool::new(false);

/// Mock active-low button wired to a GPIO line
#[derive(Clone, Copy)]
struct SimButton {
    id: ButtonId,
    gpio: u8,
    down: &'static AtomicBool,
}

static POWER: SimButton = SimButton {
    id: ButtonId::Power,
    gpio: 2,
    down: &POWER_DOWN,
};

static VIDEO: SimButton = SimButton {
    id: ButtonId::Video,
    gpio: 3,
    down: &VIDEO_DOWN,
};

static CLOCK: SimButton = SimButton {
    id: ButtonId::Clock,
    gpio: 4,
    down: &CLOCK_DOWN,
};

impl SimButton {
    fn press(&self, events: &ButtonEvents<'static, CriticalSectionRawMutex>) {
        info!("GPIO{} ({:?}) down", self.gpio, self.id);
        self.down.store(true, Ordering::SeqCst);
        if let Err(e) = events.on_pressed(self.id) {
            error!("Failed to queue press: {:?}", e);
        }
    }

    fn release(&self, events: &ButtonEvents<'static, CriticalSectionRawMutex>) {
        info!("GPIO{} ({:?}) up", self.gpio, self.id);
        self.down.store(false, Ordering::SeqCst);
        if let Err(e) = events.on_released(self.id) {
            error!("Failed to queue release: {:?}", e);
        }
    }

    async fn tap(&self, events: &ButtonEvents<'static, CriticalSectionRawMutex>, hold: Duration) {
        self.press(events);
        Timer::after(hold).await;
        self.release(events);
    }
}

impl embedded_hal_1::digital::ErrorType for SimButton {
    type Error = Infallible;
}

impl embedded_hal_1::digital::InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.down.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.down.load(Ordering::SeqCst))
    }
}

/// Scripted user pressing the buttons
#[embassy_executor::task]
async fn user() {
    let events = ButtonEvents::new(&EVENTS);

    loop {
        Timer::after_secs(1).await;
        info!("Turning the display on");
        POWER.tap(&events, Duration::from_millis(80)).await;

        Timer::after_millis(100).await;
        info!("Bouncing power button, should be ignored");
        POWER.tap(&events, Duration::from_millis(20)).await;

        Timer::after_secs(2).await;
        info!("Skipping to the next video");
        VIDEO.tap(&events, Duration::from_millis(100)).await;

        Timer::after_secs(2).await;
        info!("Holding clock button to set the time");
        CLOCK.tap(&events, Duration::from_millis(3000)).await;

        Timer::after_secs(2).await;
        info!("Turning the display off");
        POWER.tap(&events, Duration::from_millis(80)).await;

        Timer::after_secs(3).await;
    }
}

/// Stand-in for the video and clock renderer
#[embassy_executor::task]
async fn render(mut controller: Controller<'static, CriticalSectionRawMutex, SimButton>) {
    let mut showing = (false, false);
    let mut video = 0u32;
    let mut minutes = 0u32;

    loop {
        controller.update().await;

        let now_showing = (controller.should_video_be_playing(), controller.should_clock_be_playing());
        if now_showing != showing {
            match now_showing {
                (true, _) => info!("Playing video {}", video),
                (_, true) => info!("Showing clock {:02}:{:02}", minutes / 60, minutes % 60),
                _ => info!("Display off"),
            }
            showing = now_showing;
        }

        if controller.should_video_advance() {
            video += 1;
            info!("Playing video {}", video);
        }

        if controller.should_clock_advance() {
            minutes = (minutes + 1) % (24 * 60);
            info!("Clock set to {:02}:{:02}", minutes / 60, minutes % 60);
        }
    }
}

#[embassy_executor::task]
async fn run(spawner: Spawner) {
    info!("Starting kiosk display");

    let clock = Input::new(CLOCK, ActiveState::ActiveLow);
    let controller = Controller::new(Config::default(), &EVENTS, clock);

    spawner.must_spawn(render(controller));
    spawner.must_spawn(user());
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    static EXECUTOR: StaticCell<Executor> = StaticCell::new();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(run(spawner));
    });
}
