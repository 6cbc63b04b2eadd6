//! Joystick input sampling
//!
//! Raw levels come from any [`PinSource`]; the [`Sampler`] debounces them
//! once per poll tick and reports which levels were accepted.

pub mod debounce;
pub mod sampler;

pub use debounce::DebouncedState;
pub use sampler::{Sample, Sampler};

use crate::hal::{PinId, PinLevel};

/// Anything that can report the current level of a joystick pin
pub trait PinSource {
    /// Read the level of `pin` right now
    fn read_level(&mut self, pin: PinId) -> PinLevel;
}
