//! Handlers for MIDI generation and the generated-MIDI catalog.

use axum::extract::{Path, State};
use axum::Json;
use burntbeats_core::error::CoreError;
use burntbeats_core::generation::{GenerationResult, GenerationService};
use burntbeats_core::naming::validate_filename;
use burntbeats_core::services::midi::MidiRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{display_path, into_success};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/generate-midi`.
///
/// Required fields are `Option` so that a missing field is reported as a
/// validation error (400) rather than a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMidiBody {
    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 200, message = "title must be 1-200 characters")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "theme is required"),
        length(min = 1, max = 500, message = "theme must be 1-500 characters")
    )]
    pub theme: Option<String>,
    #[validate(
        required(message = "genre is required"),
        length(min = 1, max = 100, message = "genre must be 1-100 characters")
    )]
    pub genre: Option<String>,
    #[validate(
        required(message = "tempo is required"),
        range(min = 20, max = 300, message = "tempo must be between 20 and 300 BPM")
    )]
    pub tempo: Option<u32>,
    /// Target length in seconds.
    #[validate(range(min = 1, max = 600, message = "duration must be between 1 and 600 seconds"))]
    pub duration: Option<u32>,
    #[serde(default)]
    pub use_ai_lyrics: bool,
    #[validate(length(min = 1, max = 100))]
    pub voice_id: Option<String>,
}

impl GenerateMidiBody {
    /// Build the typed request. Only call after validation.
    fn into_request(self) -> MidiRequest {
        MidiRequest {
            title: self.title.unwrap_or_default(),
            theme: self.theme.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            tempo: self.tempo.unwrap_or_default(),
            duration: self.duration,
            use_ai_lyrics: self.use_ai_lyrics,
            voice_id: self.voice_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMidiResponse {
    pub success: bool,
    pub midi_path: String,
    pub metadata_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/generate-midi
pub async fn generate_midi(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateMidiBody>,
) -> AppResult<Json<GenerateMidiResponse>> {
    let result = state.midi.generate(body.into_request()).await;
    let GenerationResult {
        output_path,
        metadata_path,
        ..
    } = into_success(result)?;

    let midi_path = output_path
        .ok_or_else(|| AppError::InternalError("MIDI result has no output path".into()))?;

    Ok(Json(GenerateMidiResponse {
        success: true,
        midi_path: display_path(&midi_path),
        metadata_path: metadata_path.as_deref().map(display_path),
    }))
}

/// GET /api/midi/list
pub async fn list_midi(State(state): State<AppState>) -> Json<FileListResponse> {
    let files = state.midi.list_generated().await;
    Json(FileListResponse { files })
}

/// GET /api/midi/{filename}/metadata
///
/// Returns the parsed metadata sidecar written next to the MIDI file.
pub async fn get_midi_metadata(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    validate_filename(&filename)?;

    let midi_path = state.midi.output_dir().join(&filename);
    let metadata = state.midi.get_metadata(&midi_path).await.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "MIDI metadata",
            id: filename,
        })
    })?;

    Ok(Json(metadata))
}
