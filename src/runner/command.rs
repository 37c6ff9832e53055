//! Command execution
//!
//! This module spawns command-backed tasks.

use crate::runner::{Outcome, Streams};
use std::io::Write;
use std::process::{Command as StdCommand, Stdio};

/// Run `tokens` as an external process, the first token being the program
///
/// Captured streams are piped and copied into `streams` once the process
/// exits. Streams passing through are inherited by the child.
pub fn execute_command(tokens: &[String], streams: &mut Streams<'_>) -> Outcome {
    let Some((program, args)) = tokens.split_first() else {
        return Outcome::Error("empty command".to_string());
    };

    let mut command = StdCommand::new(program);
    command.args(args);
    command.stdin(Stdio::inherit());
    command.stdout(if streams.out().is_captured() {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    command.stderr(if streams.err().is_captured() {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    let output = match command.output() {
        Ok(output) => output,
        Err(e) => return Outcome::Error(format!("Failed to execute '{}': {}", program, e)),
    };

    if let Err(e) = streams.out().write_all(&output.stdout) {
        return Outcome::Error(format!("Failed to capture output: {}", e));
    }
    if let Err(e) = streams.err().write_all(&output.stderr) {
        return Outcome::Error(format!("Failed to capture output: {}", e));
    }

    if output.status.success() {
        Outcome::Success
    } else {
        Outcome::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CapturePolicy;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn run(parts: &[&str]) -> (Outcome, crate::runner::CapturedOutput) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut streams = Streams::new(CapturePolicy::ALL, &mut out, &mut err);
        let outcome = execute_command(&tokens(parts), &mut streams);
        (outcome, streams.into_captured())
    }

    #[test]
    fn test_execute_simple_command() {
        let (outcome, captured) = run(&["echo", "test"]);
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(captured.out, b"test\n");
    }

    #[test]
    fn test_execute_command_captures_stderr() {
        let (outcome, captured) = run(&["sh", "-c", "echo oops >&2"]);
        assert_eq!(outcome, Outcome::Success);
        assert!(captured.out.is_empty());
        assert_eq!(captured.err, b"oops\n");
    }

    #[test]
    fn test_execute_failing_command() {
        let (outcome, _) = run(&["false"]);
        assert_eq!(outcome, Outcome::Failure);
    }

    #[test]
    fn test_execute_missing_program() {
        let (outcome, _) = run(&["rdoit-no-such-program-xyz"]);
        assert!(matches!(outcome, Outcome::Error(msg) if msg.contains("rdoit-no-such-program-xyz")));
    }
}
