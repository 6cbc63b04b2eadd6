//! Cooperative polling loop for one menu session
//!
//! Each iteration renders the menu, samples the joystick once, forwards
//! the resulting events and then sleeps for the poll interval. The loop
//! ends when the selection is confirmed, or when the optional tick limit
//! runs out.

use log::{debug, info};
use std::thread;
use std::time::Duration;

use super::selection::{SelectionEvent, SelectionState};
use crate::input::{PinSource, Sampler};

/// Poll cadence of the reference hardware setup
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Consumer of selection state and notifications
pub trait Presenter {
    /// Draw the menu with the current selection highlighted
    fn render(&mut self, state: &SelectionState);

    /// Report an event raised during the last tick
    fn notify(&mut self, event: &SelectionEvent);
}

/// Session timing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay between ticks
    pub poll_interval: Duration,
    /// Give up after this many ticks
    pub max_ticks: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_ticks: None,
        }
    }
}

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The button confirmed this choice
    Confirmed { index: usize, ticks: u64 },
    /// The tick limit ran out first
    Abandoned { index: usize, ticks: u64 },
}

impl SessionOutcome {
    pub fn index(&self) -> usize {
        match *self {
            SessionOutcome::Confirmed { index, .. } | SessionOutcome::Abandoned { index, .. } => {
                index
            }
        }
    }

    pub fn ticks(&self) -> u64 {
        match *self {
            SessionOutcome::Confirmed { ticks, .. } | SessionOutcome::Abandoned { ticks, .. } => {
                ticks
            }
        }
    }
}

/// One pass through a menu
pub struct Session<S: PinSource> {
    sampler: Sampler<S>,
    state: SelectionState,
    config: SessionConfig,
}

impl<S: PinSource> Session<S> {
    pub fn new(sampler: Sampler<S>, state: SelectionState, config: SessionConfig) -> Self {
        Self {
            sampler,
            state,
            config,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Run one tick: sample, update selection, notify
    ///
    /// Returns true once the selection is confirmed.
    pub fn step<P: Presenter>(&mut self, presenter: &mut P) -> bool {
        let samples = self.sampler.tick();
        for event in self.state.apply_tick(&samples) {
            debug!("{:?}", event);
            presenter.notify(&event);
        }
        self.state.is_confirmed()
    }

    /// Poll until confirmed or out of ticks
    pub fn run<P: Presenter>(&mut self, presenter: &mut P) -> SessionOutcome {
        info!(
            "menu session started: {} choices, polling every {:?}",
            self.state.choice_count(),
            self.config.poll_interval
        );

        let mut ticks = 0u64;
        loop {
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                info!("menu session abandoned after {} ticks", ticks);
                return SessionOutcome::Abandoned {
                    index: self.state.index(),
                    ticks,
                };
            }

            presenter.render(&self.state);
            ticks += 1;

            if self.step(presenter) {
                info!(
                    "choice {} confirmed after {} ticks",
                    self.state.index(),
                    ticks
                );
                return SessionOutcome::Confirmed {
                    index: self.state.index(),
                    ticks,
                };
            }

            thread::sleep(self.config.poll_interval);
        }
    }

    /// End the session and hand back the pin source
    pub fn into_source(self) -> S {
        self.sampler.into_source()
    }
}
