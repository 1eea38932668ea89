use axum::routing::post;
use axum::Router;

use crate::handlers::audioldm2;
use crate::state::AppState;

/// Routes mounted at `/audioldm2`.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(audioldm2::generate_music))
}
