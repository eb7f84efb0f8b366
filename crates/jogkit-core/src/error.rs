//! Error handling for JogKit
//!
//! Reaching a working-area boundary is not an error anywhere in JogKit;
//! these types cover misuse of the API (bad step sizes, unknown axes),
//! a stopped runtime, and malformed controller responses.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Jog control error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JogError {
    /// Step size must be a finite, positive distance
    #[error("Invalid step size: {value}")]
    InvalidStepSize {
        /// The rejected step size.
        value: f64,
    },

    /// Direction must be +1 or -1
    #[error("Invalid jog direction: {value} (expected 1 or -1)")]
    InvalidDirection {
        /// The rejected direction value.
        value: i32,
    },

    /// Axis name did not match X, Y or Z
    #[error("Unknown axis: {name}")]
    UnknownAxis {
        /// The axis name as given.
        name: String,
    },

    /// Jog timing or step configuration cannot drive a controller
    #[error("Invalid jog settings: {reason}")]
    InvalidSettings {
        /// What was wrong with the settings.
        reason: String,
    },

    /// The runtime task driving the controller has stopped
    #[error("Jog runtime is not running")]
    RuntimeStopped,

    /// A controller status report could not be parsed
    #[error("Failed to parse status report: {reason}")]
    StatusParse {
        /// Why the report was rejected.
        reason: String,
    },
}

/// Main error type for JogKit
#[derive(Error, Debug)]
pub enum Error {
    /// Jog control error
    #[error(transparent)]
    Jog(#[from] JogError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if the runtime behind this error has gone away
    pub fn is_runtime_stopped(&self) -> bool {
        matches!(self, Error::Jog(JogError::RuntimeStopped))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
