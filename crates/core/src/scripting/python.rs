//! Python script runner.
//!
//! Launches `{interpreter} {script} {args...}` under the shared
//! [`JobLimiter`] and an optional per-job timeout.

use std::path::Path;
use std::time::Duration;

use super::executor::{ProcessError, ProcessOutcome};
use super::limiter::JobLimiter;
use super::subprocess;

/// Interpreter used when none is configured.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Runs generation scripts through a fixed interpreter.
#[derive(Debug, Clone)]
pub struct PythonRunner {
    interpreter: String,
    timeout: Option<Duration>,
    limiter: JobLimiter,
}

impl PythonRunner {
    pub fn new(interpreter: impl Into<String>, limiter: JobLimiter) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout: None,
            limiter,
        }
    }

    /// Kill jobs that run longer than `timeout`. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `script` with `args` and return its captured outcome.
    ///
    /// Waits for a limiter slot before spawning.
    pub async fn run(&self, script: &Path, args: &[String]) -> Result<ProcessOutcome, ProcessError> {
        let _permit = self.limiter.acquire().await?;

        tracing::debug!(
            interpreter = %self.interpreter,
            script = %script.display(),
            arg_count = args.len(),
            "Spawning generation script",
        );

        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.arg(script).args(args);
        let outcome = subprocess::run_command(&mut cmd, self.timeout).await?;

        tracing::debug!(
            script = %script.display(),
            exit_code = outcome.exit_code,
            duration_ms = outcome.duration_ms,
            "Generation script exited",
        );
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
