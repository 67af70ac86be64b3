//! Centralized error types for the calendar widget.
//!
//! This module provides a typed error hierarchy that:
//! - Lets the widget crates classify failures precisely
//! - Provides user-friendly messages suitable for a status line
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// Errors raised by the calendar and widget crates are convertible to this
/// type. Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Data(e) => e.user_message(),
            AppError::Host(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }

    /// Whether the widget keeps running normally after this error.
    ///
    /// Data and host failures only cost the affected records or call-outs.
    pub fn is_absorbed(&self) -> bool {
        matches!(self, AppError::Data(_) | AppError::Host(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Errors in data delivered by the host (payloads, records, dates).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unrecognized payload shape")]
    UnknownShape,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl DataError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DataError::MalformedPayload(_) => "Calendar data could not be read.",
            DataError::UnknownShape => "Calendar data was in an unexpected format.",
            DataError::InvalidDate(_) => "Some events have invalid dates and were skipped.",
            DataError::InvalidRecord(_) => "Some events were incomplete and were skipped.",
        }
    }
}

/// Errors talking to the host application.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Host script '{script}' failed: {message}")]
    ScriptFailed { script: String, message: String },

    #[error("Unknown host call: {0}")]
    UnknownCall(String),
}

impl HostError {
    pub fn user_message(&self) -> &'static str {
        match self {
            HostError::ScriptFailed { .. } => "The host application could not handle the request.",
            HostError::UnknownCall(_) => "The host application sent an unsupported request.",
        }
    }
}
