//! Runtime configuration
//!
//! Loaded from an optional TOML file; every field has a default matching
//! the reference wiring (BCM2837 GPIO through `/dev/mem`, joystick on
//! GPIO17/27/22, 200 ms polls, single-sample debounce).
//!
//! ```toml
//! [gpio]
//! device = "/dev/gpiomem"
//! base = 0
//! length = 0xB0
//! pins = { axis_x = 17, axis_y = 27, button = 22 }
//!
//! [sampler]
//! poll_interval_ms = 200
//! debounce_threshold = 1
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::hal::{PinMap, BCM2837_GPIO_BASE, GPIO_LEN};
use crate::input::debounce::DEFAULT_THRESHOLD;
use crate::story::Story;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("debounce threshold must be at least 1")]
    InvalidThreshold,

    #[error("story has no choices")]
    EmptyStory,
}

/// Register block location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    /// Character device exposing physical memory
    pub device: PathBuf,
    /// Physical base address of the GPIO block within `device`
    pub base: u64,
    /// Length of the mapping in bytes
    pub length: usize,
    /// Joystick wiring
    pub pins: PinMap,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/mem"),
            base: BCM2837_GPIO_BASE,
            length: GPIO_LEN,
            pins: PinMap::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Delay between polls in milliseconds
    pub poll_interval_ms: u64,
    /// Consecutive agreeing samples before a level is accepted
    pub debounce_threshold: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            debounce_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SamplerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Complete program configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gpio: GpioConfig,
    pub sampler: SamplerConfig,
    pub story: Story,
}

impl AppConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_content(&content)
    }

    /// Parse and validate TOML content
    pub fn parse_content(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampler.debounce_threshold == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.story.choices.is_empty() {
            return Err(ConfigError::EmptyStory);
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::PinId;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_wiring() {
        let config = AppConfig::default();
        assert_eq!(config.gpio.device, PathBuf::from("/dev/mem"));
        assert_eq!(config.gpio.base, 0x3F20_0000);
        assert_eq!(config.gpio.length, 0xB0);
        assert_eq!(config.gpio.pins.number(PinId::AxisX), 17);
        assert_eq!(config.gpio.pins.number(PinId::AxisY), 27);
        assert_eq!(config.gpio.pins.number(PinId::Button), 22);
        assert_eq!(config.sampler.poll_interval(), Duration::from_millis(200));
        assert_eq!(config.sampler.debounce_threshold, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let content = r#"
[gpio]
device = "/dev/gpiomem"
base = 0

[sampler]
debounce_threshold = 3
"#;
        let config = AppConfig::parse_content(content).unwrap();
        assert_eq!(config.gpio.device, PathBuf::from("/dev/gpiomem"));
        assert_eq!(config.gpio.base, 0);
        assert_eq!(config.gpio.length, GPIO_LEN);
        assert_eq!(config.sampler.debounce_threshold, 3);
        assert_eq!(config.sampler.poll_interval_ms, 200);
        assert_eq!(config.story.choice_count(), 3);
    }

    #[test]
    fn test_invalid_pins_rejected() {
        let content = r#"
[gpio]
pins = { axis_x = 17, axis_y = 40, button = 22 }
"#;
        let err = AppConfig::parse_content(content).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("GPIO40"));

        let content = r#"
[gpio]
pins = { axis_x = 5, axis_y = 5, button = 6 }
"#;
        assert!(AppConfig::parse_content(content).is_err());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let err = AppConfig::parse_content("[sampler]\ndebounce_threshold = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold));
    }

    #[test]
    fn test_custom_story() {
        let content = r#"
[story]
text = "A fork in the road."
choices = [
    { label = "North", outcome = "Mountains." },
    { label = "South", outcome = "Sea." },
]
"#;
        let config = AppConfig::parse_content(content).unwrap();
        assert_eq!(config.story.choice_count(), 2);
        assert_eq!(config.story.resolve(1), "Sea.");

        let empty = "[story]\ntext = \"Nothing here.\"\nchoices = []\n";
        assert!(matches!(
            AppConfig::parse_content(empty),
            Err(ConfigError::EmptyStory)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampler]\npoll_interval_ms = 50").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.sampler.poll_interval(), Duration::from_millis(50));

        let missing = AppConfig::load(Path::new("/nonexistent/joystick.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_shipped_example_config() {
        let config = AppConfig::parse_content(include_str!("../config/joystick.toml")).unwrap();
        assert_eq!(config.gpio.device, PathBuf::from("/dev/gpiomem"));
        assert_eq!(config.gpio.base, 0);
        assert_eq!(config.gpio.length, 0xB0);
        assert_eq!(config.story, Story::default());
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("axis_y = 27"));
        assert_eq!(AppConfig::parse_content(&text).unwrap(), config);
    }
}
