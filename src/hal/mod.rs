//! Hardware access layer for the BCM2837 GPIO block
//!
//! - `region`: exclusive, bounds-checked mapping of the register block
//! - `gpio`: pin configuration and level decoding for the joystick pins

pub mod gpio;
pub mod region;

pub use gpio::{Gpio, PinId, PinLevel, PinMap, PinMapError, BCM2837_GPIO_BASE, GPIO_LEN};
pub use region::{MapError, PeripheralRegion};
