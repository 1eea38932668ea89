//! Shared types for external process execution.
//!
//! [`ProcessOutcome`] is what a finished child process leaves behind;
//! [`ProcessError`] covers every way a generation job can fail before or
//! after the process runs.

/// Captured result of a child process that ran to completion.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Convert a non-zero exit into [`ProcessError::NonZeroExit`].
    pub fn into_result(self) -> Result<Self, ProcessError> {
        if self.succeeded() {
            Ok(self)
        } else {
            Err(ProcessError::NonZeroExit {
                exit_code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Failure modes of a generation job.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The OS could not start the interpreter.
    #[error("Failed to start process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The script ran but exited with a failure code.
    #[error("Process exited with code {exit_code}: {stderr}")]
    NonZeroExit { exit_code: i32, stderr: String },

    /// The script exceeded the configured timeout and was killed.
    #[error("Process timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Exit code 0 but the expected artifact is missing.
    #[error("Output file was not generated: {0}")]
    MissingOutput(String),

    /// Directory creation or file access failed.
    #[error("Filesystem error: {0}")]
    Filesystem(#[source] std::io::Error),

    /// Waiting on the child failed after it was spawned.
    #[error("I/O error while waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    /// The server is shutting down and no longer starts queued jobs.
    #[error("Job limiter is closed")]
    LimiterClosed,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
