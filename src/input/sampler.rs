//! Poll-tick sampler for the three joystick pins

use log::trace;

use super::{DebouncedState, PinSource};
use crate::hal::{PinId, PinLevel};

/// Result of sampling one pin on one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub pin: PinId,
    /// Level read from the source
    pub raw: PinLevel,
    /// Level accepted by the debounce filter on this tick
    pub accepted: Option<PinLevel>,
}

/// Reads every joystick pin once per tick and debounces the result
pub struct Sampler<S: PinSource> {
    source: S,
    states: [DebouncedState; 3],
}

impl<S: PinSource> Sampler<S> {
    pub fn new(source: S, threshold: u8) -> Self {
        Self {
            source,
            states: [DebouncedState::new(threshold); 3],
        }
    }

    /// Sample AxisX, AxisY and Button, in that order
    pub fn tick(&mut self) -> [Sample; 3] {
        PinId::ALL.map(|pin| {
            let raw = self.source.read_level(pin);
            let accepted = self.states[pin.index()].feed(raw);
            trace!("{} raw={} accepted={:?}", pin, raw, accepted);
            Sample { pin, raw, accepted }
        })
    }

    /// Debounce state of `pin`
    pub fn state(&self, pin: PinId) -> &DebouncedState {
        &self.states[pin.index()]
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Stop sampling and hand the source back
    pub fn into_source(self) -> S {
        self.source
    }
}
