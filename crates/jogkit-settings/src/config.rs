//! Configuration and settings management for JogKit
//!
//! Configuration is organized into logical sections:
//! - Jog settings (hold threshold, continuous cadence, step sizes)
//! - Machine settings (units, working area, homing axes)
//! - Logging settings (output format)
//!
//! Files are JSON or TOML, chosen by extension. Missing sections and
//! fields fall back to their defaults.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use jogkit_core::{Axis, Units, WorkingArea};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Jog interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JogSettings {
    /// Whether a sustained press turns into continuous jogging
    pub continuous_jog_enabled: bool,
    /// Press duration after which a press counts as a hold
    pub hold_threshold_ms: u64,
    /// Cadence of continuous jog moves
    pub continuous_interval_ms: u64,
    /// Selectable step sizes, smallest first
    pub step_sizes: Vec<f64>,
    /// Initial step size; the second entry of `step_sizes` when unset
    pub default_step_size: Option<f64>,
    /// Releases shorter than this are ignored instead of tapping
    pub tap_debounce_ms: u64,
    /// Jog feed rate in units/min
    pub feed_rate: f64,
}

impl Default for JogSettings {
    fn default() -> Self {
        Self {
            continuous_jog_enabled: true,
            hold_threshold_ms: 500,
            continuous_interval_ms: 100,
            step_sizes: vec![0.1, 1.0, 10.0, 100.0],
            default_step_size: None,
            tap_debounce_ms: 0,
            feed_rate: 1000.0,
        }
    }
}

impl JogSettings {
    /// Hold threshold as a `Duration`
    pub fn hold_threshold(&self) -> Duration {
        Duration::from_millis(self.hold_threshold_ms)
    }

    /// Continuous jog cadence as a `Duration`
    pub fn continuous_interval(&self) -> Duration {
        Duration::from_millis(self.continuous_interval_ms)
    }

    /// Tap debounce floor as a `Duration`
    pub fn tap_debounce(&self) -> Duration {
        Duration::from_millis(self.tap_debounce_ms)
    }

    /// Step size active when a control surface is created
    ///
    /// Falls back to the second configured step, then the first, then 1.0.
    pub fn initial_step_size(&self) -> f64 {
        self.default_step_size
            .or_else(|| self.step_sizes.get(1).copied())
            .or_else(|| self.step_sizes.first().copied())
            .unwrap_or(1.0)
    }

    /// Validate jog settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.hold_threshold_ms == 0 {
            return Err(invalid("jog.hold_threshold_ms", "must be > 0"));
        }
        if self.continuous_interval_ms == 0 {
            return Err(invalid("jog.continuous_interval_ms", "must be > 0"));
        }
        if self.step_sizes.is_empty() {
            return Err(invalid("jog.step_sizes", "must not be empty"));
        }
        if let Some(bad) = self
            .step_sizes
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.0)
        {
            return Err(invalid(
                "jog.step_sizes",
                &format!("{} is not a positive distance", bad),
            ));
        }
        if let Some(step) = self.default_step_size {
            if !step.is_finite() || step <= 0.0 {
                return Err(invalid("jog.default_step_size", "must be > 0"));
            }
        }
        if !self.feed_rate.is_finite() || self.feed_rate <= 0.0 {
            return Err(invalid("jog.feed_rate", "must be > 0"));
        }
        Ok(())
    }
}

/// Machine preference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Unit of positions and step sizes
    pub units: Units,
    /// Travel envelope; jogging is unbounded when absent
    pub working_area: Option<WorkingArea>,
    /// Axes homed by the "home all" action
    pub home_axes: Vec<Axis>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            units: Units::Mm,
            working_area: None,
            home_axes: Axis::ALL.to_vec(),
        }
    }
}

impl MachineSettings {
    /// Working area expressed in the machine's configured unit
    pub fn working_area_in_machine_units(&self) -> Option<WorkingArea> {
        self.working_area.map(|area| area.in_units(self.units))
    }

    /// Validate machine settings
    pub fn validate(&self) -> SettingsResult<()> {
        if let Some(area) = &self.working_area {
            let dims = [area.width, area.height, area.depth];
            if dims.iter().any(|d| !d.is_finite() || *d < 0.0) {
                return Err(invalid(
                    "machine.working_area",
                    "dimensions must be finite and >= 0",
                ));
            }
        }
        if self.home_axes.is_empty() {
            return Err(invalid("machine.home_axes", "must not be empty"));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSettings {
    /// Output format
    pub format: LogFormat,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Jog interaction settings
    pub jog: JogSettings,
    /// Machine preferences
    pub machine: MachineSettings,
    /// Logging preferences
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config_dir>/jogkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("jogkit").join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = FileFormat::from_path(path)?;

        let content = match format {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::SaveError(format!("{}: {}", parent.display(), e)))?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.jog.validate()?;
        self.machine.validate()?;
        Ok(())
    }
}

enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
