//! Joystick Menu Driver for Raspberry Pi GPIO
//!
//! Samples a digital two-axis joystick and push-button wired to the
//! BCM2837 GPIO block and drives a text menu selection from it.
//!
//! # Architecture
//!
//! ```text
//!   Presenter (terminal)      ◀── render / events ──┐
//!                                                   │
//!          ┌────────────────────────────────────────┴┐
//!          │  menu::Session  (poll, sleep, repeat)   │
//!          │      └── SelectionState (Idle→Confirmed)│
//!          └──────────────────┬──────────────────────┘
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │ input::Sampler      │
//!                  │  └── DebouncedState │
//!                  └──────────┬──────────┘
//!                             ▼  PinSource
//!                  ┌─────────────────────┐
//!                  │ hal::Gpio           │
//!                  │  └── PeripheralRegion (mmap)
//!                  └──────────┬──────────┘
//!                             ▼
//!                        BCM2837 HW
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use joystick_menu::hal::{Gpio, PeripheralRegion, PinMap, BCM2837_GPIO_BASE, GPIO_LEN};
//! use joystick_menu::input::Sampler;
//! use joystick_menu::menu::{Session, SessionConfig, SelectionState};
//! use joystick_menu::render::TerminalPresenter;
//! use joystick_menu::story::Story;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let region = PeripheralRegion::acquire(Path::new("/dev/mem"), BCM2837_GPIO_BASE, GPIO_LEN)?;
//! let mut gpio = Gpio::new(region, PinMap::default())?;
//! gpio.configure_inputs();
//!
//! let story = Story::default();
//! let mut presenter = TerminalPresenter::stdout(&story);
//! let state = SelectionState::new(story.choice_count())?;
//! let mut session = Session::new(Sampler::new(gpio, 1), state, SessionConfig::default());
//!
//! let outcome = session.run(&mut presenter);
//! session.into_source().release();
//! presenter.show_outcome(outcome.index());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod hal;
pub mod input;
pub mod menu;
pub mod render;
pub mod story;

pub use config::{AppConfig, ConfigError};
pub use hal::{Gpio, MapError, PeripheralRegion, PinId, PinLevel, PinMap};
pub use input::{PinSource, Sampler};
pub use menu::{SelectionEvent, SelectionState, Session, SessionOutcome};
