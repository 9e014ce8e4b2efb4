use std::path::PathBuf;

use thiserror::Error;

use crate::params::Parameter;

/// Convenient result alias for the configuration library.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration error type.
///
/// Every variant is fatal for a simulation run: a configuration that fails to
/// load must not be handed to the solver.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric parameter violated its documented bound.
    #[error("{parameter} = {value} is out of range: {constraint}")]
    OutOfRange {
        parameter: Parameter,
        value: String,
        constraint: String,
    },

    /// A required parameter was absent and has no documented default.
    #[error("required parameter {parameter} is missing")]
    MissingParameter { parameter: Parameter },

    /// Individually valid parameters that cannot be used together.
    #[error("invalid parameter combination: {message}")]
    InvalidCombination { message: String },

    /// A raw value could not be interpreted as the parameter's type.
    #[error("invalid value for {parameter}: {value:?} ({reason})")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    /// The nested radiation-model configuration failed its own validation.
    #[error("invalid radiation configuration: {message}")]
    Radiation { message: String },

    /// Raised in strict mode when a source names a parameter nobody consumes.
    #[error("unknown parameter: {name}{}", format_suggestions(.suggestions))]
    UnknownParameter {
        name: String,
        suggestions: Vec<String>,
    },

    /// A configuration header contained a line that is not a recognised directive.
    #[error("malformed configuration header at line {line}: {message}")]
    HeaderSyntax { line: usize, message: String },

    /// A header `#include` pointed at a file that does not exist.
    #[error("included configuration header not found at {path}")]
    IncludeNotFound { path: PathBuf },

    /// The configuration file extension maps to no known source format.
    #[error("unsupported configuration format for {path}; expected .json or .h")]
    UnsupportedFormat { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the configuration file")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
