//! Error types for upkeep operations.
//!
//! This module defines [`UpkeepError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `Configuration` and `Validation` abort scenario composition before any
//!   step is constructed; they never have side effects.
//! - Step failures during execution are reported as [`crate::step::Outcome`]
//!   values, not errors; the executor folds hard errors from a step's `run`
//!   into a failure outcome so they are never silently discarded.
//! - Use `anyhow::Error` (via `UpkeepError::Other`) for unexpected errors.

use thiserror::Error;

/// Core error type for upkeep operations.
#[derive(Debug, Error)]
pub enum UpkeepError {
    /// Invalid or missing required scenario parameter.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A step requires a context key with no declared mapping and no default.
    #[error("Step '{step}' cannot be composed: {message}")]
    Validation { step: String, message: String },

    /// A constructed step could not carry out its work.
    #[error("Step '{step}' failed: {message}")]
    StepExecution { step: String, message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// No scenario registered under the requested name.
    #[error("Unknown scenario: {name}")]
    UnknownScenario { name: String },

    /// No standalone procedure registered under the requested id.
    #[error("Unknown procedure: {name}")]
    UnknownProcedure { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UpkeepError {
    /// Shorthand for a configuration failure.
    pub fn configuration(message: impl Into<String>) -> Self {
        UpkeepError::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a composition-time validation failure.
    pub fn validation(step: impl Into<String>, message: impl Into<String>) -> Self {
        UpkeepError::Validation {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for upkeep operations.
pub type Result<T> = std::result::Result<T, UpkeepError>;
