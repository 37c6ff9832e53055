//! Console output
//!
//! Everything the runner prints goes through a [`Console`]: task titles,
//! up-to-date lines, flushed task output and the final status line.

use crate::runner::CapturedOutput;
use colored::Colorize;
use std::cell::RefCell;
use std::io::{self, IsTerminal, Write};
use std::rc::Rc;

/// Prefix for tasks skipped because their dependencies are unchanged
pub const UP_TO_DATE_PREFIX: &str = "--- ";

/// Status line printed when a task fails
pub const TASK_FAILED: &str = "Task failed";

/// Status line printed when a task errors
pub const TASK_ERROR: &str = "Task error";

/// Output and error writers plus display settings
pub struct Console {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    color: bool,
    debug: bool,
}

impl Console {
    /// Console on the process stdout/stderr, colored when stdout is a terminal
    pub fn stdio() -> Self {
        Console {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            color: io::stdout().is_terminal(),
            debug: false,
        }
    }

    /// Plain console on arbitrary writers
    pub fn new(out: impl Write + 'static, err: impl Write + 'static) -> Self {
        Console {
            out: Box::new(out),
            err: Box::new(err),
            color: false,
            debug: false,
        }
    }

    /// Enable or disable colored status lines
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enable or disable debug messages
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Writers a task forwards uncaptured output to
    pub fn writers(&mut self) -> (&mut dyn Write, &mut dyn Write) {
        (self.out.as_mut(), self.err.as_mut())
    }

    /// Title of a task about to run
    pub fn print_title(&mut self, title: &str) {
        let _ = writeln!(self.out, "{}", title);
        let _ = self.out.flush();
    }

    /// Title of a task skipped as up to date
    pub fn print_up_to_date(&mut self, title: &str) {
        let line = format!("{}{}", UP_TO_DATE_PREFIX, title);
        if self.color {
            let _ = writeln!(self.out, "{}", line.dimmed());
        } else {
            let _ = writeln!(self.out, "{}", line);
        }
        let _ = self.out.flush();
    }

    /// Emit output buffered during a task, stdout first
    pub fn print_captured(&mut self, captured: &CapturedOutput) {
        if !captured.out.is_empty() {
            let _ = self.out.write_all(&captured.out);
            if !captured.out.ends_with(b"\n") {
                let _ = self.out.write_all(b"\n");
            }
            let _ = self.out.flush();
        }
        if !captured.err.is_empty() {
            let _ = self.err.write_all(&captured.err);
            let _ = self.err.flush();
        }
    }

    /// Final line after a failing task
    pub fn print_failed(&mut self) {
        self.print_status(TASK_FAILED);
    }

    /// Final line after an erroring task, with the error on stderr
    pub fn print_error(&mut self, message: &str) {
        self.print_status(TASK_ERROR);
        if !message.is_empty() {
            let _ = writeln!(self.err, "{}", message.trim_end());
            let _ = self.err.flush();
        }
    }

    /// Print debug message (only with debug enabled)
    pub fn print_debug(&mut self, message: &str) {
        if self.debug {
            let _ = writeln!(self.err, "[DEBUG] {}", message);
        }
    }

    fn print_status(&mut self, status: &str) {
        if self.color {
            let _ = writeln!(self.out, "{}", status.red().bold());
        } else {
            let _ = writeln!(self.out, "{}", status);
        }
        let _ = self.out.flush();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}

/// Cloneable in-memory writer, for observing console output
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Everything written so far, split on newlines
    pub fn lines(&self) -> Vec<String> {
        self.contents().split('\n').map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
