//! Task runner
//!
//! Runs registered tasks in registration order, skipping the ones whose
//! dependencies are unchanged, and stops at the first task that does not
//! succeed.

use crate::dependency::{Dependency, KvStore};
use crate::error::{Result, TaskError};
use crate::runner::{CapturePolicy, Outcome, Task};
use crate::ui::Console;
use std::path::Path;

/// Aggregate result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    Success = 0,
    Failure = 1,
    Error = 2,
}

/// Process exit code when the run cannot start (bad task file, unusable store)
pub const SETUP_ERROR_EXIT_CODE: i32 = 3;

impl RunResult {
    /// Process exit code for this result
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

/// Sequential task runner
pub struct Runner {
    dependency: Dependency,
    policy: CapturePolicy,
    console: Console,
    tasks: Vec<Task>,
}

impl Runner {
    /// Create a runner backed by the signature file at `dep_file`
    pub fn new(dep_file: impl AsRef<Path>, verbosity: u8) -> Result<Self> {
        let dependency = Dependency::open(dep_file)?;
        Self::with_dependency(dependency, verbosity)
    }

    /// Create a runner backed by an arbitrary store
    pub fn with_store(store: Box<dyn KvStore>, verbosity: u8) -> Result<Self> {
        Self::with_dependency(Dependency::with_store(store), verbosity)
    }

    fn with_dependency(dependency: Dependency, verbosity: u8) -> Result<Self> {
        Ok(Runner {
            dependency,
            policy: CapturePolicy::from_verbosity(verbosity)?,
            console: Console::stdio(),
            tasks: Vec::new(),
        })
    }

    /// Print through `console` instead of the process stdout/stderr
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Capture policy derived from the verbosity level
    pub fn policy(&self) -> CapturePolicy {
        self.policy
    }

    /// Register a task, rejecting duplicate names
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if self.task(task.name()).is_some() {
            return Err(TaskError::InvalidTask(format!(
                "task '{}' is already registered",
                task.name()
            ))
            .into());
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Registered tasks, in execution order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Registered task by name
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name() == name)
    }

    /// Signature store used by this runner
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// Run every registered task in order
    pub fn run(&mut self) -> RunResult {
        let Runner {
            dependency,
            policy,
            console,
            tasks,
        } = self;

        for task in tasks.iter() {
            let title = task.title();

            if dependency.is_up_to_date(task) {
                console.print_up_to_date(&title);
                console.print_debug(&format!("Task '{}' is up to date", task.name()));
                continue;
            }

            console.print_title(&title);
            let (out, err) = console.writers();
            let (mut outcome, captured) = task.execute(*policy, out, err);

            if outcome == Outcome::Success {
                if let Err(e) = dependency.record(task) {
                    outcome = Outcome::Error(e.to_string());
                }
            }

            match outcome {
                Outcome::Success | Outcome::UpToDate => {
                    console.print_debug(&format!("Task '{}' completed", task.name()));
                }
                Outcome::Failure => {
                    console.print_captured(&captured);
                    console.print_failed();
                    return RunResult::Failure;
                }
                Outcome::Error(message) => {
                    console.print_captured(&captured);
                    console.print_error(&message);
                    return RunResult::Error;
                }
            }
        }

        RunResult::Success
    }
}
