//! Core configuration types
//!
//! This module defines the data structures that represent a dodo.yml task file.

use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Signature file, relative to the task file directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dep_file: Option<String>,

    /// Verbosity level (0, 1 or 2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,

    /// Interpreter for string commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Tasks, in execution order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A task definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Task {
    /// Unique task name
    pub name: String,

    /// Display title (defaults to one derived from name and command)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Command to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Command>,

    /// Files (or glob patterns) the task depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Files the task produces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Program and arguments, run without a shell
    Tokens(Vec<String>),

    /// Command line run through the interpreter
    Shell(String),
}

impl Command {
    pub fn is_empty(&self) -> bool {
        match self {
            Command::Tokens(tokens) => tokens.first().map_or(true, |p| p.is_empty()),
            Command::Shell(line) => line.trim().is_empty(),
        }
    }
}
