//! Error types for rdoit

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rdoit operations
pub type Result<T> = std::result::Result<T, DoitError>;

/// Main error type for rdoit
#[derive(Error, Debug)]
pub enum DoitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task definition and registration errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// Signature store errors
    #[error("Dependency error: {0}")]
    Dependency(#[from] DependencyError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find task file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Verbosity must be 0, 1 or 2 (got {0})")]
    InvalidVerbosity(u8),

    #[error("Task '{0}' is defined more than once")]
    DuplicateTask(String),

    #[error("Task '{0}' is not defined")]
    TaskNotFound(String),
}

/// Task construction and registration errors
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

/// Signature store errors
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("Dependency '{0}' does not exist")]
    Missing(PathBuf),

    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Signature store '{path}' is corrupt: {error}")]
    Corrupt { path: PathBuf, error: String },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for task operations
pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Specialized result type for signature store operations
pub type DependencyResult<T> = std::result::Result<T, DependencyError>;

impl DependencyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DependencyError::Io {
            path: path.into(),
            source,
        }
    }
}
