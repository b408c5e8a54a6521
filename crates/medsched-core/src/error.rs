//! Core error types for medsched-core.
//!
//! The engine itself never fails on partial or malformed schedule data; it
//! degrades to the base dose instead. Errors are reserved for input
//! validation before a schedule is built and for configuration I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for fallible engine entry points that combine decoding with
/// validation. Configuration I/O reports [`ConfigError`] directly.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Validation errors raised before a schedule is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Step amount is zero, negative, or not a number
    #[error("Step amount must be greater than zero (got {0})")]
    NonPositiveStep(f64),

    /// Step interval shorter than one day
    #[error("Step interval must be at least 1 day (got {0})")]
    IntervalTooShort(u32),

    /// Plan would produce more breakpoints than allowed
    #[error("Schedule needs {needed} steps, more than the limit of {limit}")]
    TooManySteps { needed: u64, limit: usize },

    /// Custom dose range is incoherent
    #[error("Invalid dose range {start_day}-{end_day}: {message}")]
    InvalidRange {
        start_day: u32,
        end_day: u32,
        message: String,
    },

    /// Date does not exist on the calendar
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
