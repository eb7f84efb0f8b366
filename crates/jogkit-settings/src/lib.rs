//! JogKit Settings Crate
//!
//! Jog timing, step sizes, machine envelope and logging preferences,
//! loaded from and saved to JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{Config, JogSettings, LogFormat, LoggingSettings, MachineSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
