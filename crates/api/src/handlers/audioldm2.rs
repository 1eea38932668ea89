//! Handler for AudioLDM2 text-to-music generation.

use axum::extract::State;
use axum::Json;
use burntbeats_core::generation::GenerationService;
use burntbeats_core::services::audioldm2::AudioLdm2Request;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{display_path, into_success, public_url};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Request body for `POST /api/audioldm2/generate`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMusicBody {
    #[validate(
        required(message = "prompt is required"),
        length(min = 1, max = 1000, message = "prompt must be 1-1000 characters")
    )]
    pub prompt: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub instance_word: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub object_class: Option<String>,
    /// Clip length in seconds.
    #[validate(range(min = 1.0, max = 120.0, message = "audioLength must be between 1 and 120 seconds"))]
    pub audio_length: Option<f64>,
    #[validate(range(min = 1, max = 500))]
    pub num_inference_steps: Option<u32>,
    #[validate(range(min = 0.0, max = 20.0))]
    pub guidance_scale: Option<f64>,
}

impl GenerateMusicBody {
    fn into_request(self) -> AudioLdm2Request {
        AudioLdm2Request {
            prompt: self.prompt.unwrap_or_default(),
            instance_word: self.instance_word,
            object_class: self.object_class,
            audio_length_secs: self.audio_length,
            num_inference_steps: self.num_inference_steps,
            guidance_scale: self.guidance_scale,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMusicResponse {
    pub success: bool,
    pub audio_file: String,
    pub audio_url: Option<String>,
}

/// POST /api/audioldm2/generate
pub async fn generate_music(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateMusicBody>,
) -> AppResult<Json<GenerateMusicResponse>> {
    let result = state.audioldm2.generate(body.into_request()).await;
    let audio_file = into_success(result)?
        .output_path
        .ok_or_else(|| AppError::InternalError("AudioLDM2 result has no output path".into()))?;

    Ok(Json(GenerateMusicResponse {
        success: true,
        audio_url: public_url(&state.config.storage_root, &audio_file),
        audio_file: display_path(&audio_file),
    }))
}
