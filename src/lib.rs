//! rdoit - a make-like task runner
//!
//! Tasks run in registration order. A task whose dependency files have not
//! changed since its last successful run is skipped; the first task that
//! fails or errors stops the run.

// Public modules
pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{DoitError, Result};
pub use runner::{Outcome, RunResult, Runner, Task};

/// Current version of rdoit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
