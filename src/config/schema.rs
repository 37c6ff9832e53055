//! Configuration validation
//!
//! This module provides validation logic for task files.

use crate::config::types::{Config, Task};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(verbosity) = config.verbosity {
        if verbosity > 2 {
            return Err(ConfigError::InvalidVerbosity(verbosity));
        }
    }

    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a program".to_string(),
            ));
        }
    }

    let mut seen = HashSet::new();
    for task in &config.tasks {
        validate_task(task)?;
        if !seen.insert(task.name.as_str()) {
            return Err(ConfigError::DuplicateTask(task.name.clone()));
        }
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(task: &Task) -> ConfigResult<()> {
    if task.name.trim().is_empty() {
        return Err(ConfigError::Invalid("task name must not be empty".to_string()));
    }

    match &task.cmd {
        None => Err(ConfigError::Invalid(format!(
            "task '{}' has no cmd",
            task.name
        ))),
        Some(cmd) if cmd.is_empty() => Err(ConfigError::Invalid(format!(
            "task '{}' has an empty cmd",
            task.name
        ))),
        Some(_) => Ok(()),
    }
}

/// Pick the tasks named in `selected`, in task file order
///
/// An empty selection keeps every task.
pub fn select_tasks<'a>(config: &'a Config, selected: &[String]) -> ConfigResult<Vec<&'a Task>> {
    for name in selected {
        if !config.tasks.iter().any(|task| &task.name == name) {
            return Err(ConfigError::TaskNotFound(name.clone()));
        }
    }

    Ok(config
        .tasks
        .iter()
        .filter(|task| selected.is_empty() || selected.contains(&task.name))
        .collect())
}
