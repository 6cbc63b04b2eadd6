//! Per-pin debounce filter
//!
//! A level is accepted once it has been seen on `threshold` consecutive
//! samples. The default threshold of 1 accepts every sample and leaves
//! noise rejection to the inter-poll delay.

use crate::hal::PinLevel;

/// Default number of agreeing samples before a level is accepted
pub const DEFAULT_THRESHOLD: u8 = 1;

/// Debounce state for a single pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebouncedState {
    stable: Option<PinLevel>,
    candidate: Option<PinLevel>,
    agreement: u8,
    threshold: u8,
}

impl Default for DebouncedState {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl DebouncedState {
    /// Create a filter; a threshold of 0 behaves like 1
    pub const fn new(threshold: u8) -> Self {
        Self {
            stable: None,
            candidate: None,
            agreement: 0,
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feed one raw sample
    ///
    /// Returns the level if it is accepted on this tick. A level keeps
    /// being accepted on every following tick for as long as it holds.
    pub fn feed(&mut self, level: PinLevel) -> Option<PinLevel> {
        if self.candidate == Some(level) {
            self.agreement = self.agreement.saturating_add(1);
        } else {
            self.candidate = Some(level);
            self.agreement = 1;
        }

        if self.agreement >= self.threshold {
            self.stable = Some(level);
            Some(level)
        } else {
            None
        }
    }

    /// Last accepted level, if any
    pub fn stable(&self) -> Option<PinLevel> {
        self.stable
    }

    /// Level currently gathering agreement
    pub fn candidate(&self) -> Option<PinLevel> {
        self.candidate
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::PinLevel::{High, Low};

    #[test]
    fn test_threshold_one_accepts_every_sample() {
        let mut state = DebouncedState::default();
        assert_eq!(state.feed(Low), Some(Low));
        assert_eq!(state.feed(Low), Some(Low));
        assert_eq!(state.feed(High), Some(High));
        assert_eq!(state.stable(), Some(High));
    }

    #[test]
    fn test_threshold_requires_consecutive_agreement() {
        let mut state = DebouncedState::new(3);
        assert_eq!(state.feed(High), None);
        assert_eq!(state.feed(High), None);
        assert_eq!(state.stable(), None);
        assert_eq!(state.feed(High), Some(High));
        assert_eq!(state.feed(High), Some(High));

        // A glitch restarts the count without disturbing the stable level
        assert_eq!(state.feed(Low), None);
        assert_eq!(state.stable(), Some(High));
        assert_eq!(state.candidate(), Some(Low));
        assert_eq!(state.feed(High), None);
        assert_eq!(state.feed(High), None);
        assert_eq!(state.feed(High), Some(High));
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let mut state = DebouncedState::new(0);
        assert_eq!(state.threshold(), 1);
        assert_eq!(state.feed(Low), Some(Low));
    }
}
