//! Error types for tweak-control operations.

use thiserror::Error;
use twix_core::TwixError;

/// Result type for tweak-control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised while building or configuring controls.
///
/// The per-event paths (change, update, sampling) never fail; invalid edits
/// are rolled back rather than reported.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Configuration value out of range.
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation attempted on a control that has been unmounted.
    #[error("Control has been unmounted")]
    Unmounted,
}

impl From<TwixError> for ControlError {
    fn from(err: TwixError) -> Self {
        match err {
            TwixError::InvalidArg { what } => ControlError::InvalidArg { what },
            TwixError::NonFinite { what, .. } => ControlError::InvalidArg { what },
        }
    }
}

impl From<serde_yaml::Error> for ControlError {
    fn from(err: serde_yaml::Error) -> Self {
        ControlError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ControlError {
    fn from(err: std::io::Error) -> Self {
        ControlError::Config(err.to_string())
    }
}
