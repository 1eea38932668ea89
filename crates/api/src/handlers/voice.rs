//! Handlers for RVC voice cloning.

use axum::extract::{Multipart, State};
use axum::Json;
use burntbeats_core::generation::GenerationService;
use burntbeats_core::services::voice::{VoiceCloneRequest, VoiceCloneService, VoiceInfo};
use serde::Serialize;

use super::{display_path, into_success, public_url};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Voice model used when the client does not pick one.
pub const DEFAULT_VOICE_ID: &str = "default";

/// Maximum length of the text to synthesize.
const MAX_TEXT_LEN: usize = 5000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneVoiceResponse {
    pub success: bool,
    pub voice_id: String,
    pub audio_url: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceInfo>,
}

/// Fields collected from the clone multipart form.
#[derive(Default)]
struct CloneForm {
    audio: Option<(String, Vec<u8>)>,
    text: Option<String>,
    voice_id: Option<String>,
}

/// POST /api/voice/clone
///
/// Multipart form: `audio` (file), `text`, optional `voiceId`.
pub async fn clone_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<CloneVoiceResponse>> {
    let mut form = CloneForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "audio" => {
                let filename = field.file_name().unwrap_or("sample.wav").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.audio = Some((filename, data.to_vec()));
            }
            "text" => {
                form.text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "voiceId" => {
                form.voice_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            _ => {} // ignore unknown fields
        }
    }

    let (filename, data) = form
        .audio
        .ok_or_else(|| AppError::BadRequest("Missing required 'audio' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded audio file is empty".into()));
    }

    let text = form
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required 'text' field".into()))?;
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::BadRequest(format!(
            "text must be at most {MAX_TEXT_LEN} characters"
        )));
    }

    let voice_id = form
        .voice_id
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());

    let extension = VoiceCloneService::sample_extension(&filename)?;
    let audio_path = state
        .voice
        .stage_upload(&filename, &extension, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store voice sample: {e}")))?;

    let result = state
        .voice
        .generate(VoiceCloneRequest {
            audio_path: audio_path.clone(),
            text,
            voice_id: voice_id.clone(),
        })
        .await;
    state.voice.discard_upload(&audio_path).await;

    let output_path = into_success(result)?
        .output_path
        .ok_or_else(|| AppError::InternalError("Voice result has no output path".into()))?;

    let audio_url = public_url(&state.config.storage_root, &output_path)
        .unwrap_or_else(|| display_path(&output_path));

    Ok(Json(CloneVoiceResponse {
        success: true,
        voice_id,
        audio_url,
    }))
}

/// GET /api/voice/list
pub async fn list_voices(State(state): State<AppState>) -> Json<VoiceListResponse> {
    let voices = state.voice.list_voices().await;
    Json(VoiceListResponse { voices })
}
