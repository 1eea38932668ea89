//! Route definitions for RVC voice cloning.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::voice;
use crate::state::AppState;

/// Routes mounted at `/voice`.
///
/// ```text
/// POST   /clone                         -> clone_voice (multipart)
/// GET    /list                          -> list_voices
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clone", post(voice::clone_voice))
        .route("/list", get(voice::list_voices))
}
