//! Menu selection state machine
//!
//! ```text
//!            Y low: index - 1 (wraps)
//!            Y high: index + 1 (wraps)
//!            X: reported only
//!          ┌──────────┐
//!          ▼          │
//!       ┌──────┐──────┘   button low   ┌───────────┐
//!       │ Idle │ ──────────────────────▶│ Confirmed │
//!       └──────┘                        └───────────┘
//! ```

use log::debug;
use thiserror::Error;

use crate::hal::{PinId, PinLevel};
use crate::input::Sample;

/// Horizontal joystick direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// X axis low reads as left, high as right
    pub const fn from_level(level: PinLevel) -> Self {
        match level {
            PinLevel::Low => Direction::Left,
            PinLevel::High => Direction::Right,
        }
    }
}

/// Notification raised by an accepted input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    /// X axis movement; never changes the selection
    Axis(Direction),
    /// Selection moved by the Y axis
    Moved { from: usize, to: usize },
    /// Button pressed; the session is over
    Confirmed { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("a menu needs at least one choice")]
    NoChoices,
}

/// Selection over a fixed number of choices
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    index: usize,
    choice_count: usize,
    phase: Phase,
}

impl SelectionState {
    pub fn new(choice_count: usize) -> Result<Self, SelectionError> {
        if choice_count == 0 {
            return Err(SelectionError::NoChoices);
        }
        Ok(Self {
            index: 0,
            choice_count,
            phase: Phase::Idle,
        })
    }

    /// Currently highlighted choice, always below `choice_count`
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn choice_count(&self) -> usize {
        self.choice_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_confirmed(&self) -> bool {
        self.phase == Phase::Confirmed
    }

    /// Move selection up, wrapping from the first choice to the last
    pub fn move_up(&mut self) {
        self.index = (self.index + self.choice_count - 1) % self.choice_count;
    }

    /// Move selection down, wrapping from the last choice to the first
    pub fn move_down(&mut self) {
        self.index = (self.index + 1) % self.choice_count;
    }

    /// Apply an accepted level of one pin
    ///
    /// Returns `None` once confirmed, and for a released button.
    pub fn apply(&mut self, pin: PinId, level: PinLevel) -> Option<SelectionEvent> {
        if self.is_confirmed() {
            return None;
        }

        match pin {
            PinId::AxisX => Some(SelectionEvent::Axis(Direction::from_level(level))),
            PinId::AxisY => {
                let from = self.index;
                match level {
                    PinLevel::Low => self.move_up(),
                    PinLevel::High => self.move_down(),
                }
                debug!("selection {} -> {}", from, self.index);
                Some(SelectionEvent::Moved {
                    from,
                    to: self.index,
                })
            }
            PinId::Button => {
                if level.is_high() {
                    return None;
                }
                self.phase = Phase::Confirmed;
                debug!("selection {} confirmed", self.index);
                Some(SelectionEvent::Confirmed { index: self.index })
            }
        }
    }

    /// Apply every accepted sample of one tick, in sampling order
    pub fn apply_tick(&mut self, samples: &[Sample]) -> Vec<SelectionEvent> {
        samples
            .iter()
            .filter_map(|s| s.accepted.map(|level| (s.pin, level)))
            .filter_map(|(pin, level)| self.apply(pin, level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::PinLevel::{High, Low};

    #[test]
    fn test_reference_scenario() {
        let mut state = SelectionState::new(3).unwrap();
        assert_eq!(state.index(), 0);

        state.apply(PinId::AxisY, Low);
        assert_eq!(state.index(), 2);
        state.apply(PinId::AxisY, Low);
        assert_eq!(state.index(), 1);
        state.apply(PinId::AxisY, High);
        assert_eq!(state.index(), 2);

        let event = state.apply(PinId::Button, Low);
        assert_eq!(event, Some(SelectionEvent::Confirmed { index: 2 }));
        assert_eq!(state.phase(), Phase::Confirmed);
        assert_eq!(state.index(), 2);
    }

    #[test]
    fn test_wraparound_both_directions() {
        for count in 1..6 {
            let mut state = SelectionState::new(count).unwrap();
            state.apply(PinId::AxisY, Low);
            assert_eq!(state.index(), count - 1);
            state.apply(PinId::AxisY, High);
            assert_eq!(state.index(), 0);

            for _ in 0..count * 3 {
                state.apply(PinId::AxisY, High);
                assert!(state.index() < count);
            }
            assert_eq!(state.index(), 0);
        }
    }

    #[test]
    fn test_x_axis_never_moves_selection() {
        let mut state = SelectionState::new(4).unwrap();
        state.apply(PinId::AxisY, High);

        for level in [Low, High, High, Low, Low] {
            let event = state.apply(PinId::AxisX, level);
            assert_eq!(
                event,
                Some(SelectionEvent::Axis(Direction::from_level(level)))
            );
            assert_eq!(state.index(), 1);
        }
    }

    #[test]
    fn test_confirmed_is_terminal() {
        let mut state = SelectionState::new(3).unwrap();
        state.apply(PinId::Button, Low);

        for pin in PinId::ALL {
            for level in [Low, High] {
                assert_eq!(state.apply(pin, level), None);
            }
        }
        assert_eq!(state.index(), 0);
        assert!(state.is_confirmed());
    }

    #[test]
    fn test_released_button_is_ignored() {
        let mut state = SelectionState::new(3).unwrap();
        assert_eq!(state.apply(PinId::Button, High), None);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_tick_moves_before_confirming() {
        let mut state = SelectionState::new(3).unwrap();
        let samples = [
            Sample {
                pin: PinId::AxisX,
                raw: High,
                accepted: Some(High),
            },
            Sample {
                pin: PinId::AxisY,
                raw: High,
                accepted: Some(High),
            },
            Sample {
                pin: PinId::Button,
                raw: Low,
                accepted: Some(Low),
            },
        ];

        let events = state.apply_tick(&samples);
        assert_eq!(
            events,
            vec![
                SelectionEvent::Axis(Direction::Right),
                SelectionEvent::Moved { from: 0, to: 1 },
                SelectionEvent::Confirmed { index: 1 },
            ]
        );
    }

    #[test]
    fn test_unaccepted_samples_ignored() {
        let mut state = SelectionState::new(3).unwrap();
        let samples = [Sample {
            pin: PinId::AxisY,
            raw: Low,
            accepted: None,
        }];
        assert!(state.apply_tick(&samples).is_empty());
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_empty_menu_rejected() {
        assert_eq!(SelectionState::new(0), Err(SelectionError::NoChoices));
    }
}
