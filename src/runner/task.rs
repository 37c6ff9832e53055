//! Task types and execution logic
//!
//! A task is a named action plus the files it depends on and produces. The
//! action is either an external command or an in-process callable.

use crate::config;
use crate::error::{TaskError, TaskResult};
use crate::runner::capture::{panic_message, SilencePanics};
use crate::runner::{execute_command, CapturePolicy, CapturedOutput, Streams};
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Result of handling one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dependencies unchanged, task skipped
    UpToDate,
    /// Task ran and reported success
    Success,
    /// Task ran and reported unsuccessful completion
    Failure,
    /// Task could not run or faulted while running
    Error(String),
}

/// Values a callable may return to report success or failure
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for () {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

type BoxedFunc = Box<dyn Fn(&mut Streams<'_>) -> anyhow::Result<bool>>;

/// In-process action
pub struct FuncAction {
    label: String,
    func: BoxedFunc,
}

impl FuncAction {
    /// Wrap a callable that writes through the task streams
    pub fn new<F, R>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Streams<'_>) -> anyhow::Result<R> + 'static,
        R: Truthy,
    {
        FuncAction {
            label: label.into(),
            func: Box::new(move |streams: &mut Streams<'_>| {
                func(streams).map(|value| value.is_truthy())
            }),
        }
    }
}

impl fmt::Debug for FuncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// What a task does when it runs
#[derive(Debug)]
pub enum Action {
    /// External process, first token is the program
    Cmd(Vec<String>),
    /// In-process callable
    Func(FuncAction),
}

impl Action {
    fn describe(&self) -> String {
        match self {
            Action::Cmd(tokens) => format!("Cmd: {}", tokens.join(" ")),
            Action::Func(func) => format!("Func: {}", func.label),
        }
    }
}

/// A registered unit of work
#[derive(Debug)]
pub struct Task {
    name: String,
    title: Option<String>,
    dependencies: Vec<PathBuf>,
    targets: Vec<PathBuf>,
    action: Action,
}

impl Task {
    /// Create a task, validating its name and action
    pub fn new(name: impl Into<String>, action: Action) -> TaskResult<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(TaskError::InvalidTask("task name is empty".to_string()));
        }
        if let Action::Cmd(tokens) = &action {
            if tokens.first().map_or(true, |program| program.is_empty()) {
                return Err(TaskError::InvalidTask(format!(
                    "task '{}' has an empty command",
                    name
                )));
            }
        }

        Ok(Task {
            name,
            title: None,
            dependencies: Vec::new(),
            targets: Vec::new(),
            action,
        })
    }

    /// Command-backed task
    pub fn cmd<I, S>(name: impl Into<String>, tokens: I) -> TaskResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, Action::Cmd(tokens.into_iter().map(Into::into).collect()))
    }

    /// Callable-backed task taking no arguments
    ///
    /// Output the callable prints with `println!`/`eprintln!` goes straight to
    /// the process stdout/stderr and is never captured, whatever the
    /// verbosity. Use [`Task::func_with_streams`] for output that follows the
    /// capture policy.
    pub fn func<F, R>(name: impl Into<String>, func: F) -> TaskResult<Self>
    where
        F: Fn() -> anyhow::Result<R> + 'static,
        R: Truthy,
    {
        let label = std::any::type_name::<F>();
        Self::new(name, Action::Func(FuncAction::new(label, move |_: &mut Streams<'_>| func())))
    }

    /// Callable-backed task writing through the task streams
    pub fn func_with_streams<F, R>(name: impl Into<String>, func: F) -> TaskResult<Self>
    where
        F: Fn(&mut Streams<'_>) -> anyhow::Result<R> + 'static,
        R: Truthy,
    {
        let label = std::any::type_name::<F>();
        Self::new(name, Action::Func(FuncAction::new(label, func)))
    }

    /// Build a task from a task file entry
    ///
    /// Relative paths resolve against `base_dir`; string commands run through
    /// `interpreter`. Dependency entries are glob patterns.
    pub fn from_config(
        def: &config::Task,
        base_dir: &Path,
        interpreter: &[String],
    ) -> TaskResult<Self> {
        let tokens = match &def.cmd {
            Some(config::Command::Tokens(tokens)) => tokens.clone(),
            Some(config::Command::Shell(line)) if !line.trim().is_empty() => interpreter
                .iter()
                .cloned()
                .chain(std::iter::once(line.clone()))
                .collect(),
            Some(config::Command::Shell(_)) | None => {
                return Err(TaskError::InvalidTask(format!(
                    "task '{}' has no command",
                    def.name
                )))
            }
        };

        let mut dependencies = Vec::new();
        for pattern in &def.dependencies {
            dependencies.extend(expand_pattern(base_dir, pattern)?);
        }

        let mut task = Task::cmd(def.name.clone(), tokens)?
            .with_dependencies(dependencies)
            .with_targets(def.targets.iter().map(|target| base_dir.join(target)));
        task.title = def.title.clone();
        Ok(task)
    }

    /// Set the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the files this task depends on
    pub fn with_dependencies<I, P>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Set the files this task produces
    pub fn with_targets<I, P>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display title, derived from the name and action unless set explicitly
    pub fn title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{} => {}", self.name, self.action.describe()),
        }
    }

    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Run the action under `policy`
    ///
    /// Uncaptured output goes straight to `out`/`err`. Whatever was captured
    /// is returned alongside the outcome, including when a callable panics.
    pub fn execute(
        &self,
        policy: CapturePolicy,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> (Outcome, CapturedOutput) {
        let mut streams = Streams::new(policy, out, err);

        let outcome = match &self.action {
            Action::Cmd(tokens) => execute_command(tokens, &mut streams),
            Action::Func(func) => call(func, &mut streams),
        };

        (outcome, streams.into_captured())
    }
}

fn call(action: &FuncAction, streams: &mut Streams<'_>) -> Outcome {
    let _silence = SilencePanics::new();
    match panic::catch_unwind(AssertUnwindSafe(|| (action.func)(streams))) {
        Ok(Ok(true)) => Outcome::Success,
        Ok(Ok(false)) => Outcome::Failure,
        Ok(Err(e)) => Outcome::Error(format!("{:#}", e)),
        Err(payload) => Outcome::Error(panic_message(payload.as_ref())),
    }
}

/// Expand a dependency pattern, keeping it literally when nothing matches
///
/// Only `pattern` is matched as a glob; `base_dir` is taken literally.
fn expand_pattern(base_dir: &Path, pattern: &str) -> TaskResult<Vec<PathBuf>> {
    let full = base_dir.join(pattern);

    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![full]);
    }

    let glob_path = if Path::new(pattern).is_absolute() {
        PathBuf::from(pattern)
    } else {
        Path::new(&glob::Pattern::escape(&base_dir.to_string_lossy())).join(pattern)
    };
    let paths = glob::glob(&glob_path.to_string_lossy()).map_err(|e| {
        TaskError::InvalidTask(format!("invalid dependency pattern '{}': {}", pattern, e))
    })?;
    let mut matched: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
    matched.sort();

    if matched.is_empty() {
        Ok(vec![full])
    } else {
        Ok(matched)
    }
}
