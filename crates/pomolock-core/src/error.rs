//! Core error types for pomolock-core.
//!
//! This module defines the error hierarchy using thiserror. Most of these are
//! recovered close to where they happen: a broken config falls back to
//! defaults, a failed alert is logged, an early commit is ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomolock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Skip challenge misuse
    #[error("Skip challenge error: {0}")]
    Challenge(#[from] ChallengeError),

    /// Session driver misuse
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
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

    /// Key not present in the schema
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Raised when a skip is redeemed before the phrase was typed in full.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("phrase not complete ({typed} of {required} characters typed)")]
    Incomplete { typed: usize, required: usize },
}

/// Session driver errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Skip requested outside a break
    #[error("no break in progress")]
    NotResting,

    /// Skip input or commit without an active challenge
    #[error("no skip challenge in progress")]
    NoChallenge,

    #[error(transparent)]
    Challenge(#[from] ChallengeError),
}

/// Failure of an alert sink (notification daemon, sound device).
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),

    #[error("sound playback failed: {0}")]
    Sound(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
