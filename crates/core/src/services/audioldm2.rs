//! AudioLDM2 text-to-music service.
//!
//! ```text
//! {python} {script} --prompt=P --model_path=M --output_file=OUT
//!          [--num_inference_steps=N] [--guidance_scale=G] [--audio_length_in_s=S]
//!          [--instance_word=W] [--object_class=C]
//! ```

use std::path::Path;

use serde_json::Value;

use super::{flag, ProcessInvocation};
use crate::catalog;
use crate::generation::{GenerationResult, GenerationService};

/// Extension of generated music files.
pub const MUSIC_EXTENSION: &str = "wav";

/// Filename stem of every generated music file.
pub const GENERATED_PREFIX: &str = "generated";

/// Model used when none is configured.
pub const DEFAULT_MODEL_PATH: &str = "cvssp/audioldm2-music";

/// Input for one AudioLDM2 job. Unset numeric fields fall back to the
/// script's own defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioLdm2Request {
    pub prompt: String,
    /// Personalization token, paired with `object_class`.
    pub instance_word: Option<String>,
    pub object_class: Option<String>,
    pub audio_length_secs: Option<f64>,
    pub num_inference_steps: Option<u32>,
    pub guidance_scale: Option<f64>,
}

impl AudioLdm2Request {
    fn to_args(&self, model_path: &str, output: &Path) -> Vec<String> {
        let mut args = vec![
            flag("--prompt", &self.prompt),
            flag("--model_path", model_path),
            flag("--output_file", output.display()),
        ];
        if let Some(steps) = self.num_inference_steps {
            args.push(flag("--num_inference_steps", steps));
        }
        if let Some(scale) = self.guidance_scale {
            args.push(flag("--guidance_scale", scale));
        }
        if let Some(length) = self.audio_length_secs {
            args.push(flag("--audio_length_in_s", length));
        }
        if let Some(word) = &self.instance_word {
            args.push(flag("--instance_word", word));
        }
        if let Some(class) = &self.object_class {
            args.push(flag("--object_class", class));
        }
        args
    }
}

/// Generates `generated_{millis}.wav` files from text prompts.
#[derive(Debug)]
pub struct AudioLdm2Service {
    invocation: ProcessInvocation,
    model_path: String,
}

impl AudioLdm2Service {
    pub fn new(invocation: ProcessInvocation, model_path: impl Into<String>) -> Self {
        Self {
            invocation,
            model_path: model_path.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.invocation.output_dir()
    }
}

impl GenerationService for AudioLdm2Service {
    type Request = AudioLdm2Request;

    async fn generate(&self, request: AudioLdm2Request) -> GenerationResult {
        if let Err(e) = self.invocation.ensure_output_dir().await {
            return e.into();
        }

        let output = self
            .invocation
            .next_output_path(GENERATED_PREFIX, MUSIC_EXTENSION);
        let args = request.to_args(&self.model_path, &output);

        tracing::info!(
            prompt = %request.prompt,
            model = %self.model_path,
            output = %output.display(),
            "Generating music with AudioLDM2",
        );

        match self.invocation.run_expecting(&args, &output).await {
            Ok(outcome) => {
                tracing::info!(duration_ms = outcome.duration_ms, "AudioLDM2 generation finished");
                GenerationResult::succeeded(output, None)
            }
            Err(e) => {
                tracing::error!(error = %e, "AudioLDM2 generation failed");
                e.into()
            }
        }
    }

    async fn list_generated(&self) -> Vec<String> {
        self.invocation.list_generated(MUSIC_EXTENSION).await
    }

    async fn get_metadata(&self, output_path: &Path) -> Option<Value> {
        catalog::read_metadata(output_path).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
