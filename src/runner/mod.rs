//! Task execution engine
//!
//! This module handles the execution of tasks, including command running,
//! output capture, and the run loop.

pub mod capture;
pub mod command;
pub mod run;
pub mod task;

// Re-export main types
pub use capture::*;
pub use command::*;
pub use run::*;
pub use task::*;
