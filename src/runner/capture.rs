//! Output capture
//!
//! A task runs with a [`Streams`] pair built from the active [`CapturePolicy`].
//! Each stream either buffers what the task writes or forwards it live to the
//! console. The buffers belong to the `Streams` value, so the runner gets them
//! back however the task ends.

use crate::error::{ConfigError, ConfigResult};
use std::any::Any;
use std::cell::Cell;
use std::io::{self, Write};
use std::panic;
use std::sync::Once;

/// Which standard streams are buffered while a task runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePolicy {
    pub capture_out: bool,
    pub capture_err: bool,
}

impl CapturePolicy {
    /// Buffer stdout and stderr
    pub const ALL: CapturePolicy = CapturePolicy {
        capture_out: true,
        capture_err: true,
    };

    /// Buffer stdout, stderr passes through
    pub const STDOUT: CapturePolicy = CapturePolicy {
        capture_out: true,
        capture_err: false,
    };

    /// Everything passes through
    pub const NONE: CapturePolicy = CapturePolicy {
        capture_out: false,
        capture_err: false,
    };

    /// Map a verbosity level (0, 1 or 2) to a policy
    pub fn from_verbosity(verbosity: u8) -> ConfigResult<Self> {
        match verbosity {
            0 => Ok(Self::ALL),
            1 => Ok(Self::STDOUT),
            2 => Ok(Self::NONE),
            other => Err(ConfigError::InvalidVerbosity(other)),
        }
    }
}

/// A single task stream
pub enum Sink<'a> {
    Captured(Vec<u8>),
    Live(&'a mut dyn Write),
}

impl Sink<'_> {
    pub fn is_captured(&self) -> bool {
        matches!(self, Sink::Captured(_))
    }

    fn into_buffer(self) -> Vec<u8> {
        match self {
            Sink::Captured(buffer) => buffer,
            Sink::Live(_) => Vec::new(),
        }
    }
}

impl Write for Sink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Captured(buffer) => buffer.write(buf),
            Sink::Live(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Captured(_) => Ok(()),
            Sink::Live(writer) => writer.flush(),
        }
    }
}

/// The stdout/stderr pair handed to an executing task
pub struct Streams<'a> {
    out: Sink<'a>,
    err: Sink<'a>,
}

impl<'a> Streams<'a> {
    /// Build streams for `policy`, forwarding uncaptured output to `out`/`err`
    pub fn new(policy: CapturePolicy, out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        let out = if policy.capture_out {
            Sink::Captured(Vec::new())
        } else {
            Sink::Live(out)
        };
        let err = if policy.capture_err {
            Sink::Captured(Vec::new())
        } else {
            Sink::Live(err)
        };
        Streams { out, err }
    }

    /// Task standard output
    pub fn out(&mut self) -> &mut Sink<'a> {
        &mut self.out
    }

    /// Task standard error
    pub fn err(&mut self) -> &mut Sink<'a> {
        &mut self.err
    }

    /// Release the console and keep whatever was buffered
    pub fn into_captured(self) -> CapturedOutput {
        CapturedOutput {
            out: self.out.into_buffer(),
            err: self.err.into_buffer(),
        }
    }
}

/// Output buffered during one task execution
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub out: Vec<u8>,
    pub err: Vec<u8>,
}

thread_local! {
    static PANICS_SILENCED: Cell<bool> = const { Cell::new(false) };
}

static INSTALL_HOOK: Once = Once::new();

/// Keeps the panic hook quiet on this thread while alive
///
/// A panicking callable is reported as a task error, so the default
/// "thread panicked at" message must not reach the real stderr.
pub(crate) struct SilencePanics {
    previous: bool,
}

impl SilencePanics {
    pub(crate) fn new() -> Self {
        INSTALL_HOOK.call_once(|| {
            let default_hook = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if !PANICS_SILENCED.with(|silenced| silenced.get()) {
                    default_hook(info);
                }
            }));
        });
        let previous = PANICS_SILENCED.with(|silenced| silenced.replace(true));
        SilencePanics { previous }
    }
}

impl Drop for SilencePanics {
    fn drop(&mut self) {
        PANICS_SILENCED.with(|silenced| silenced.set(self.previous));
    }
}

/// Text carried by a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}
