pub mod audioldm2;
pub mod health;
pub mod midi;
pub mod voice;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate-midi                  generate MIDI (POST)
/// /midi/list                      list generated MIDI files (GET)
/// /midi/{filename}/metadata       metadata sidecar (GET)
///
/// /voice/clone                    clone voice from uploaded sample (POST, multipart)
/// /voice/list                     trained voice models (GET)
///
/// /audioldm2/generate             text-to-music (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // MIDI generation and catalog.
        .merge(midi::router())
        // RVC voice cloning.
        .nest("/voice", voice::router())
        // AudioLDM2 music generation.
        .nest("/audioldm2", audioldm2::router())
}
