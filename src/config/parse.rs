//! Task file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, DoitError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default task file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["dodo.yml", "dodo.yaml"];

/// Signature file used when the task file does not name one
pub const DEFAULT_DEP_FILE: &str = ".rdoit.json";

/// Interpreter used for string commands when the task file does not name one
pub const DEFAULT_INTERPRETER: &[&str] = &["sh", "-c"];

/// Find the task file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the task file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a task file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, DoitError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read '{}': {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse a task file from a string
pub fn parse_config(yaml: &str) -> Result<Config, DoitError> {
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse the task file with automatic discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), DoitError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Directory relative paths in a task file resolve against
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl Config {
    /// Signature file location for a task file at `config_path`
    pub fn dep_file_path(&self, config_path: &Path) -> PathBuf {
        config_dir(config_path).join(self.dep_file.as_deref().unwrap_or(DEFAULT_DEP_FILE))
    }

    /// Interpreter for string commands
    pub fn interpreter(&self) -> Vec<String> {
        match &self.interpreter {
            Some(interpreter) => interpreter.clone(),
            None => DEFAULT_INTERPRETER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Command;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
tasks:
  - name: hello
    cmd: echo hello
  - name: list
    cmd: [ls, -1]
    dependencies: [a.txt]
    targets: [b.txt]
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.tasks.len(), 2);
        assert_eq!(config.tasks[0].name, "hello");
        assert!(matches!(&config.tasks[0].cmd, Some(Command::Shell(line)) if line == "echo hello"));
        assert!(matches!(&config.tasks[1].cmd, Some(Command::Tokens(t)) if t == &["ls", "-1"]));
        assert_eq!(config.tasks[1].dependencies, vec!["a.txt"]);
        assert_eq!(config.tasks[1].targets, vec!["b.txt"]);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.tasks.is_empty());
        assert_eq!(config.verbosity, None);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_config("tasks: [");
        assert!(matches!(result, Err(DoitError::Yaml(_))));
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dodo.yml");
        fs::write(&config_path, "tasks: []\n").unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dodo.yaml");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&config_path, "tasks: []\n").unwrap();

        let found = find_config_file_from(sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_config_file_from(temp_dir.path().to_path_buf());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_dep_file_and_interpreter_defaults() {
        let config = Config::default();
        let path = Path::new("/work/dodo.yml");

        assert_eq!(config.dep_file_path(path), PathBuf::from("/work/.rdoit.json"));
        assert_eq!(config.interpreter(), vec!["sh", "-c"]);

        let config = parse_config("dep_file: deps/sigs.json\ninterpreter: [bash, -c]\n").unwrap();
        assert_eq!(config.dep_file_path(path), PathBuf::from("/work/deps/sigs.json"));
        assert_eq!(config.interpreter(), vec!["bash", "-c"]);
    }

    #[test]
    fn test_config_dir_of_bare_file_name() {
        assert_eq!(config_dir(Path::new("dodo.yml")), PathBuf::from("."));
    }
}
