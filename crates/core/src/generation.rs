//! Generation result envelope and the service trait shared by the MIDI,
//! voice-clone and AudioLDM2 services.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scripting::executor::ProcessError;

/// Outcome of one generation job.
///
/// `success` is only true when the script exited cleanly *and* its primary
/// artifact exists on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn succeeded(output_path: PathBuf, metadata_path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            output_path: Some(output_path),
            metadata_path,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            metadata_path: None,
            error: Some(error.into()),
        }
    }
}

impl From<ProcessError> for GenerationResult {
    fn from(err: ProcessError) -> Self {
        Self::failed(err.to_string())
    }
}

/// A service that turns a typed request into an artifact produced by an
/// external script.
///
/// None of the operations fail: errors are folded into the returned
/// [`GenerationResult`], an empty list, or `None`.
pub trait GenerationService: Send + Sync {
    /// Typed input for one job.
    type Request: Send;

    /// Run the script for `request` and verify its output.
    fn generate(
        &self,
        request: Self::Request,
    ) -> impl Future<Output = GenerationResult> + Send;

    /// Filenames of previously generated artifacts.
    fn list_generated(&self) -> impl Future<Output = Vec<String>> + Send;

    /// Parsed metadata sidecar of an artifact, if any.
    fn get_metadata(&self, output_path: &Path) -> impl Future<Output = Option<Value>> + Send;
}
