//! The three generation services and the invocation plumbing they share.
//!
//! Each service only decides its argument shape and output naming; the
//! common steps (create output dir, spawn, check exit code, check the
//! artifact exists) live in [`ProcessInvocation`].

pub mod audioldm2;
pub mod midi;
pub mod voice;

use std::path::{Path, PathBuf};

use crate::catalog;
use crate::naming::{timestamped_filename, MillisClock};
use crate::scripting::executor::{ProcessError, ProcessOutcome};
use crate::scripting::python::PythonRunner;

/// One external script bound to the directory it writes into.
#[derive(Debug)]
pub struct ProcessInvocation {
    runner: PythonRunner,
    script_path: PathBuf,
    output_dir: PathBuf,
    clock: MillisClock,
}

impl ProcessInvocation {
    pub fn new(
        runner: PythonRunner,
        script_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            script_path: script_path.into(),
            output_dir: output_dir.into(),
            clock: MillisClock::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Next timestamp from this invocation's monotonic clock.
    pub fn next_stamp(&self) -> i64 {
        self.clock.next()
    }

    /// Create the output directory (and parents) if missing.
    pub async fn ensure_output_dir(&self) -> Result<(), ProcessError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(ProcessError::Filesystem)
    }

    /// A fresh `{output_dir}/{stem}_{millis}.{extension}` path.
    pub fn next_output_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(timestamped_filename(stem, self.next_stamp(), extension))
    }

    /// Run the script and return its outcome regardless of exit code.
    pub async fn run(&self, args: &[String]) -> Result<ProcessOutcome, ProcessError> {
        self.runner.run(&self.script_path, args).await
    }

    /// Run the script and require both a zero exit and `expected_output`
    /// on disk afterwards.
    pub async fn run_expecting(
        &self,
        args: &[String],
        expected_output: &Path,
    ) -> Result<ProcessOutcome, ProcessError> {
        let outcome = self.run(args).await?.into_result()?;

        if !catalog::file_exists(expected_output).await {
            tracing::warn!(
                script = %self.script_path.display(),
                output = %expected_output.display(),
                "Script reported success but wrote no output",
            );
            return Err(ProcessError::MissingOutput(
                expected_output.display().to_string(),
            ));
        }
        Ok(outcome)
    }

    pub async fn list_generated(&self, extension: &str) -> Vec<String> {
        catalog::list_files_with_extension(&self.output_dir, extension).await
    }
}

/// `{name}={value}` as a single argument.
///
/// Values that begin with `-` (a title like "-Intro-") would otherwise be
/// read as options by the scripts' argument parsers.
pub(crate) fn flag(name: &str, value: impl std::fmt::Display) -> String {
    format!("{name}={value}")
}
