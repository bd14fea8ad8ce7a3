//! Error types for the build optimizer.
//!
//! The optimizer clamps out-of-range input instead of rejecting it, so the
//! error surface is small: an unknown build goal (nothing sensible can be
//! optimized without one) and failures while loading catalog data.

use thiserror::Error;

/// Result type alias for build optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;

/// Errors raised by the build optimizer and its data loaders.
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// The requested build goal is not present in the game data.
    #[error("Unknown build goal '{id}', available goals: {available:?}")]
    UnknownBuildGoal {
        /// The goal identifier that was requested
        id: String,
        /// Goal identifiers the game data does know about
        available: Vec<String>,
    },

    /// An attribute name or abbreviation could not be parsed.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A catalog or request document failed to parse.
    #[error("Failed to parse '{label}': {reason}")]
    Parse {
        /// File name or bundled asset label
        label: String,
        /// Parser error message
        reason: String,
    },

    /// Reading a catalog or request file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OptimizerError {
    /// Build a [`OptimizerError::Parse`] from any displayable parser error.
    pub fn parse(label: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            label: label.into(),
            reason: err.to_string(),
        }
    }
}
