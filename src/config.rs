//! Configuration management for USB Keyboard Decode
//!
//! The binary takes no command-line options; everything it needs comes from
//! a TOML file at a platform-specific location.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/usb-keyboard-decode/config.toml` |
//! | macOS | `~/Library/Application Support/usb-keyboard-decode/config.toml` |
//! | Windows | `%APPDATA%\usb-keyboard-decode\config.toml` |
//!
//! Set `USB_KEYBOARD_DECODE_CONFIG` to use a different file.
//!
//! ## Example
//!
//! ```no_run
//! use usb_keyboard_decode::config::Config;
//! use usb_keyboard_decode::output::{Environment, OutputMode};
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.output.mode = OutputMode::Simulate;
//! config.output.environment = Environment::Command;
//! config.save().expect("Failed to save config");
//! ```

use crate::output::{Environment, OutputMode};
use crate::replay::{HoldOrder, ReplaySettings};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "USB_KEYBOARD_DECODE_CONFIG";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Honors [`CONFIG_ENV`]; otherwise creates the platform config directory
/// if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("usb-keyboard-decode");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output mode settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Live replay settings
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// raw, simulate, replay or json
    #[serde(default)]
    pub mode: OutputMode,
    /// Simulation environment (text or command)
    #[serde(default)]
    pub environment: Environment,
    /// Write the JSON report here instead of stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

/// Replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between injected keystrokes in milliseconds
    pub delay_ms: u64,
    /// Time given to the operator for manual selection gestures
    pub selection_pause_secs: u64,
    /// Key that starts the replay
    pub start_key: String,
    /// Key that aborts the replay
    pub stop_key: String,
    /// Whether modifier releases or presses go first
    pub hold_order: HoldOrder,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            delay_ms: 50,
            selection_pause_secs: 5,
            start_key: "F9".to_string(),
            stop_key: "F10".to_string(),
            hold_order: HoldOrder::default(),
        }
    }
}

impl ReplayConfig {
    /// Engine settings derived from this section
    pub fn settings(&self) -> ReplaySettings {
        ReplaySettings {
            delay: Duration::from_millis(self.delay_ms),
            selection_pause: Duration::from_secs(self.selection_pause_secs),
            hold_order: self.hold_order,
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
