//! Route definitions for MIDI generation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::midi;
use crate::state::AppState;

/// Routes merged at the `/api` root.
///
/// ```text
/// POST   /generate-midi                 -> generate_midi
/// GET    /midi/list                     -> list_midi
/// GET    /midi/{filename}/metadata      -> get_midi_metadata
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-midi", post(midi::generate_midi))
        .route("/midi/list", get(midi::list_midi))
        .route("/midi/{filename}/metadata", get(midi::get_midi_metadata))
}
