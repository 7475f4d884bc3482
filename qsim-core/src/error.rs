//! Error types for the simulation framework

use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Malformed configuration, detected before any event is scheduled.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// An internal invariant was violated. Never recovered.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// A distribution produced a value that is not a valid delay.
    #[error("Sampling failure at '{site}': drew {value}")]
    SamplingFailure { site: &'static str, value: f64 },

    #[error("Time validation error: {value} is not a finite non-negative time")]
    InvalidTime { value: f64 },
}

impl SimError {
    /// Shorthand for [`SimError::InvalidConfiguration`].
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SimError::IllegalState`].
    pub fn illegal_state(message: impl Into<String>) -> Self {
        SimError::IllegalState(message.into())
    }
}

/// Convenience alias used across the workspace.
pub type SimResult<T> = Result<T, SimError>;
