//! ExecutionSession trait — the abstraction over the remote code sandbox.
//!
//! The orchestrator owns exactly one session for the lifetime of a run and
//! issues one blocking `execute` at a time. The concrete implementation
//! (a Jupyter Kernel Gateway client) lives in `codeact-kernel`.

use crate::error::SessionError;
use async_trait::async_trait;

/// What one execution produced.
///
/// A drain timeout on the remote channel yields whatever partial output was
/// collected so far as a *successful* result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the sandboxed code failed (non-empty stderr).
    pub fn failed(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// A remote sandboxed execution session.
#[async_trait]
pub trait ExecutionSession: Send + Sync {
    /// Acquire (or reuse) the remote session. Idempotent: if a session is
    /// already held, implementations log and return the existing handle's
    /// identifier rather than erroring.
    async fn start(&self) -> std::result::Result<String, SessionError>;

    /// Execute a code fragment and collect its output. May block up to a
    /// bounded per-message timeout while draining incremental results.
    async fn execute(&self, code: &str) -> std::result::Result<ExecutionOutput, SessionError>;

    /// Release the remote session. Idempotent: a no-op with a log line when
    /// no session is active.
    async fn shutdown(&self) -> std::result::Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_failed_on_stderr() {
        assert!(!ExecutionOutput::new("5\n", "").failed());
        assert!(ExecutionOutput::new("", "ZeroDivisionError: division by zero").failed());
    }
}
