//! Kiosk Button Service
//!
//! Turns the power, video and clock buttons of a kiosk display into a debounced
//! [`Mode`] plus the one-shot advance requests polled by the render loop.

#![no_std]
#![warn(missing_docs)]

mod fmt;

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod event;
pub mod input;
pub mod state;

pub use config::Config;
pub use controller::Controller;
pub use error::Error;
pub use event::{ButtonEvents, ButtonId, Edge, Event, EventQueue};
pub use state::{ButtonStateMachine, Mode, Status};
