//! Command argument validation utilities
//!
//! Checks on command arguments that go beyond what clap parsing enforces.

use anyhow::{Result, anyhow};
use std::path::Path;

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
    /// A path argument does not point at a file
    MissingFile { argument: String, path: String },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
            CommandValidationError::MissingFile { argument, path } => {
                write!(f, "{} '{}' does not exist or is not a file", argument, path)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

/// Validate a plugin id or dependency coordinate argument
pub fn validate_lookup_argument(argument: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: argument.to_string(),
                value: value.to_string(),
                reason: "cannot be empty or whitespace only".to_string(),
            },
        ));
    }
    Ok(())
}

/// Validate an explicit --settings path
pub fn validate_settings_path(path: &Option<String>) -> Result<()> {
    if let Some(path) = path
        && !Path::new(path).is_file()
    {
        return Err(validation_error_to_anyhow(
            CommandValidationError::MissingFile {
                argument: "settings file".to_string(),
                path: path.clone(),
            },
        ));
    }
    Ok(())
}
