//! Error types for plant configuration.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// One violated physical invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.field, self.value, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid plant configuration: {}", format_violations(.violations))]
    Invalid { violations: Vec<Violation> },

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConfigurationError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigurationError::Invalid { violations } => violations,
            _ => &[],
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(e: serde_json::Error) -> Self {
        ConfigurationError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigurationError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigurationError::Parse(e.to_string())
    }
}
