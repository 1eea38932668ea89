//! RVC voice-clone service.
//!
//! Wraps the RVC integration script:
//!
//! ```text
//! {python} {script} --action=clone --audio=IN --voice-id=V --text=T --output=OUT
//! {python} {script} --action=list
//! ```
//!
//! Uploaded samples are staged in a directory outside the served storage
//! tree and removed once the clone job is done.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{flag, ProcessInvocation};
use crate::catalog;
use crate::error::CoreError;
use crate::generation::{GenerationResult, GenerationService};
use crate::naming::{sanitize_name, timestamped_filename};
use crate::scripting::executor::ProcessError;

/// Extension of cloned voice audio.
pub const VOICE_EXTENSION: &str = "wav";

/// Filename stem of every cloned voice file.
pub const CLONED_VOICE_PREFIX: &str = "cloned_voice";

/// Audio formats accepted as voice samples.
pub const SUPPORTED_SAMPLE_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a", "webm"];

/// Input for one voice-clone job.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCloneRequest {
    /// Uploaded sample on local disk.
    pub audio_path: PathBuf,
    /// Text the cloned voice should speak.
    pub text: String,
    pub voice_id: String,
}

impl VoiceCloneRequest {
    fn to_args(&self, output: &Path) -> Vec<String> {
        vec![
            flag("--action", "clone"),
            flag("--audio", self.audio_path.display()),
            flag("--voice-id", &self.voice_id),
            flag("--text", &self.text),
            flag("--output", output.display()),
        ]
    }
}

/// A trained voice model as reported by `--action=list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub has_embedding: bool,
    #[serde(default)]
    pub has_f0: bool,
    #[serde(default)]
    pub has_content: bool,
}

/// Clones voices into `cloned_voice_{millis}.wav` files.
#[derive(Debug)]
pub struct VoiceCloneService {
    invocation: ProcessInvocation,
    uploads_dir: PathBuf,
}

impl VoiceCloneService {
    /// `uploads_dir` must not be inside any statically served directory.
    pub fn new(invocation: ProcessInvocation, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocation,
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.invocation.output_dir()
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Validate a sample's extension from its original filename.
    ///
    /// Returns the lowercased extension.
    pub fn sample_extension(original_name: &str) -> Result<String, CoreError> {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if SUPPORTED_SAMPLE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(CoreError::Validation(format!(
                "Unsupported audio format '.{ext}'. Supported: {}",
                SUPPORTED_SAMPLE_EXTENSIONS.join(", ")
            )))
        }
    }

    /// Write an uploaded sample to the uploads directory under a unique name.
    pub async fn stage_upload(
        &self,
        original_name: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, ProcessError> {
        let dir = self.uploads_dir();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(ProcessError::Filesystem)?;

        let stem = Path::new(original_name)
            .file_stem()
            .map(|s| sanitize_name(&s.to_string_lossy()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "sample".to_string());
        let path = dir.join(timestamped_filename(
            &stem,
            self.invocation.next_stamp(),
            extension,
        ));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(ProcessError::Filesystem)?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Staged voice sample");
        Ok(path)
    }

    /// Delete a sample written by [`stage_upload`](Self::stage_upload).
    ///
    /// Paths outside the uploads directory are left alone. Failures are
    /// logged; the clone result does not depend on them.
    pub async fn discard_upload(&self, path: &Path) {
        if !path.starts_with(&self.uploads_dir) {
            tracing::warn!(path = %path.display(), "Refusing to discard file outside uploads dir");
            return;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Discarded voice sample"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to discard voice sample")
            }
        }
    }

    /// Voice models known to the RVC script.
    ///
    /// Any failure (spawn, exit code, unparsable stdout) yields an empty list.
    pub async fn list_voices(&self) -> Vec<VoiceInfo> {
        let args = [flag("--action", "list")];
        let outcome = match self.invocation.run(&args).await.and_then(|o| o.into_result()) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Listing voices failed");
                return Vec::new();
            }
        };

        match serde_json::from_str(outcome.stdout.trim()) {
            Ok(voices) => voices,
            Err(e) => {
                tracing::warn!(error = %e, "Voice list output is not a JSON array");
                Vec::new()
            }
        }
    }
}

impl GenerationService for VoiceCloneService {
    type Request = VoiceCloneRequest;

    async fn generate(&self, request: VoiceCloneRequest) -> GenerationResult {
        if let Err(e) = self.invocation.ensure_output_dir().await {
            return e.into();
        }

        let output = self
            .invocation
            .next_output_path(CLONED_VOICE_PREFIX, VOICE_EXTENSION);
        let args = request.to_args(&output);

        tracing::info!(
            voice_id = %request.voice_id,
            sample = %request.audio_path.display(),
            output = %output.display(),
            "Cloning voice",
        );

        match self.invocation.run_expecting(&args, &output).await {
            Ok(_) => GenerationResult::succeeded(output, None),
            Err(e) => {
                tracing::error!(voice_id = %request.voice_id, error = %e, "Voice cloning failed");
                e.into()
            }
        }
    }

    async fn list_generated(&self) -> Vec<String> {
        self.invocation.list_generated(VOICE_EXTENSION).await
    }

    async fn get_metadata(&self, output_path: &Path) -> Option<Value> {
        catalog::read_metadata(output_path).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
