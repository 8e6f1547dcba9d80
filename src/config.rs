//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::smoothing::validate_alpha;
use crate::controller::JoystickOptions;
use crate::error::{JoystickError, Result};
use crate::report::protocol::{DEFAULT_PRODUCT_ID, DEFAULT_VENDOR_ID};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Device selection and delivery mode
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    #[serde(default = "default_product_id")]
    pub product_id: u16,

    #[serde(default = "default_use_events")]
    pub use_events: bool,
}

/// Axis smoothing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SmoothingConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

/// Pull-mode timing
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default)]
    pub timeout_ms: u32,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub file: String,
}

// Default value functions
fn default_vendor_id() -> u16 { DEFAULT_VENDOR_ID }
fn default_product_id() -> u16 { DEFAULT_PRODUCT_ID }
fn default_use_events() -> bool { true }

fn default_alpha() -> f64 { 0.25 }

fn default_interval_ms() -> u64 { 20 }

fn default_log_level() -> String { "info".to_string() }

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            use_events: default_use_events(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha: default_alpha(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 0,
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> JoystickError {
    JoystickError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extreme3d_hid::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.smoothing.alpha).map_err(invalid)?;

        if self.poll.timeout_ms > 10000 {
            return Err(invalid("poll timeout_ms must be between 0 and 10000"));
        }

        if self.poll.interval_ms == 0 || self.poll.interval_ms > 10000 {
            return Err(invalid("poll interval_ms must be between 1 and 10000"));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "logging level must be one of: trace, debug, info, warn, error",
            ));
        }

        Ok(())
    }

    /// Joystick construction options from this configuration
    #[must_use]
    pub fn options(&self) -> JoystickOptions {
        JoystickOptions {
            vendor_id: self.device.vendor_id,
            product_id: self.device.product_id,
            use_events: self.device.use_events,
            smoothing_enabled: self.smoothing.enabled,
            smoothing_alpha: self.smoothing.alpha,
        }
    }
}
