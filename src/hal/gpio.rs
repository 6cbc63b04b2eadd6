//! BCM2837 GPIO register access for the joystick pins
//!
//! Only the two register groups the joystick needs are touched: the
//! function-select words (3 bits per pin, ten pins per word) and the
//! first level word (one bit per pin 0-31).
//!
//! # Default Pin Assignments
//!
//! | GPIO | Function        | Direction |
//! |------|-----------------|-----------|
//! | 17   | Joystick X axis | Input     |
//! | 27   | Joystick Y axis | Input     |
//! | 22   | Joystick button | Input     |

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::region::{MapError, PeripheralRegion, WORD_SIZE};
use crate::input::PinSource;

/// BCM2837 (Raspberry Pi 3) GPIO physical base address
pub const BCM2837_GPIO_BASE: u64 = 0x3F20_0000;

/// Length of the GPIO register block in bytes
pub const GPIO_LEN: usize = 0xB0;

/// GPIO register offsets
mod regs {
    pub const GPFSEL0: usize = 0x00; // Function Select 0 (pins 0-9)
    pub const GPLEV0: usize = 0x34; // Pin Level 0 (pins 0-31)
}

/// Pins covered by one function-select word
const FSEL_PINS_PER_WORD: u8 = 10;
/// Width of one pin's function-select field
const FSEL_BITS: u32 = 3;
const FSEL_MASK: u32 = 0b111;
/// Function-select encoding for input mode
const FSEL_INPUT: u32 = 0b000;

/// Pin numbers must fit in the single GPLEV0 word
pub const PIN_LIMIT: u8 = 32;

/// Logical joystick pins
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinId {
    /// Horizontal axis (display only)
    AxisX,
    /// Vertical axis (moves the selection)
    AxisY,
    /// Push-button (confirms the selection)
    Button,
}

impl PinId {
    /// All pins in sampling order
    pub const ALL: [PinId; 3] = [PinId::AxisX, PinId::AxisY, PinId::Button];

    /// Position of this pin in [`PinId::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PinId::AxisX => "x-axis",
            PinId::AxisY => "y-axis",
            PinId::Button => "button",
        }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logic level of a pin at a sampling instant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub const fn from_bit(set: bool) -> Self {
        if set {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, PinLevel::High)
    }

    pub const fn is_low(self) -> bool {
        matches!(self, PinLevel::Low)
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinLevel::Low => f.write_str("LOW"),
            PinLevel::High => f.write_str("HIGH"),
        }
    }
}

/// Rejected pin assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinMapError {
    #[error("{pin} pin GPIO{number} is out of range (must be below 32)")]
    OutOfRange { pin: PinId, number: u8 },

    #[error("GPIO{number} is assigned to both {first} and {second}")]
    Duplicate {
        number: u8,
        first: PinId,
        second: PinId,
    },
}

/// Raw pin numbers as they appear in configuration files
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct PinNumbers {
    axis_x: u8,
    axis_y: u8,
    button: u8,
}

/// Validated GPIO numbers for the three joystick pins
///
/// Every number is below [`PIN_LIMIT`] and no two pins share a number;
/// an invalid map cannot be constructed or deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PinNumbers", into = "PinNumbers")]
pub struct PinMap {
    numbers: [u8; 3],
}

impl PinMap {
    pub fn new(axis_x: u8, axis_y: u8, button: u8) -> Result<Self, PinMapError> {
        let numbers = [axis_x, axis_y, button];

        for pin in PinId::ALL {
            let number = numbers[pin.index()];
            if number >= PIN_LIMIT {
                return Err(PinMapError::OutOfRange { pin, number });
            }
        }

        for (i, first) in PinId::ALL.iter().enumerate() {
            for second in &PinId::ALL[i + 1..] {
                if numbers[first.index()] == numbers[second.index()] {
                    return Err(PinMapError::Duplicate {
                        number: numbers[first.index()],
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        Ok(Self { numbers })
    }

    /// GPIO number bound to `pin`
    pub fn number(&self, pin: PinId) -> u8 {
        self.numbers[pin.index()]
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            numbers: [17, 27, 22],
        }
    }
}

impl TryFrom<PinNumbers> for PinMap {
    type Error = PinMapError;

    fn try_from(raw: PinNumbers) -> Result<Self, Self::Error> {
        PinMap::new(raw.axis_x, raw.axis_y, raw.button)
    }
}

impl From<PinMap> for PinNumbers {
    fn from(map: PinMap) -> Self {
        Self {
            axis_x: map.number(PinId::AxisX),
            axis_y: map.number(PinId::AxisY),
            button: map.number(PinId::Button),
        }
    }
}

/// Function-select word index and bit shift for a GPIO number
pub const fn fsel_location(number: u8) -> (usize, u32) {
    let word = regs::GPFSEL0 / WORD_SIZE + (number / FSEL_PINS_PER_WORD) as usize;
    let shift = (number % FSEL_PINS_PER_WORD) as u32 * FSEL_BITS;
    (word, shift)
}

/// Word index of the level register
pub const fn level_word_index() -> usize {
    regs::GPLEV0 / WORD_SIZE
}

/// GPIO driver over a mapped register block
#[derive(Debug)]
pub struct Gpio {
    region: PeripheralRegion,
    pins: PinMap,
}

impl Gpio {
    /// Wrap a region; it must reach the level register
    pub fn new(region: PeripheralRegion, pins: PinMap) -> Result<Self, MapError> {
        let required = regs::GPLEV0 + WORD_SIZE;
        if region.len() < required {
            return Err(MapError::RegionTooSmall {
                len: region.len(),
                required,
            });
        }
        Ok(Self { region, pins })
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    /// Put `pin` into input mode
    ///
    /// Clears the pin's 3-bit function-select field; input is the all-zero
    /// encoding, so calling this repeatedly leaves the same bits.
    pub fn configure_as_input(&mut self, pin: PinId) {
        let number = self.pins.number(pin);
        assert!(number < PIN_LIMIT, "GPIO{} outside level register", number);

        let (word, shift) = fsel_location(number);
        self.region
            .modify_word(word, |v| (v & !(FSEL_MASK << shift)) | (FSEL_INPUT << shift));
        debug!("GPIO{} ({}) configured as input", number, pin);
    }

    /// Configure every joystick pin as an input
    pub fn configure_inputs(&mut self) {
        for pin in PinId::ALL {
            self.configure_as_input(pin);
        }
    }

    /// Current level of `pin`
    pub fn read_level(&self, pin: PinId) -> PinLevel {
        let bit = 1u32 << self.pins.number(pin);
        PinLevel::from_bit(self.level_word() & bit != 0)
    }

    /// Raw GPLEV0 contents
    pub fn level_word(&self) -> u32 {
        self.region.read_word(level_word_index())
    }

    /// Give back the underlying region
    pub fn into_region(self) -> PeripheralRegion {
        self.region
    }

    /// Unmap the register block
    pub fn release(self) {
        self.region.release();
    }
}

impl PinSource for Gpio {
    fn read_level(&mut self, pin: PinId) -> PinLevel {
        Gpio::read_level(self, pin)
    }
}
