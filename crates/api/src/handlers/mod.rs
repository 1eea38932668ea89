pub mod audioldm2;
pub mod midi;
pub mod voice;

use std::path::Path;

use burntbeats_core::generation::GenerationResult;

use crate::error::{AppError, AppResult};
use crate::router::STORAGE_URL_PREFIX;

/// URL under which `path` is served, if it lives inside `storage_root`.
///
/// `{storage_root}/voices/a.wav` maps to `/storage/voices/a.wav`.
pub fn public_url(storage_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(storage_root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(format!("{STORAGE_URL_PREFIX}/{}", segments.join("/")))
}

/// Render a path for a JSON response.
pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Turn a failed [`GenerationResult`] into [`AppError::Generation`].
pub fn into_success(result: GenerationResult) -> AppResult<GenerationResult> {
    if result.success {
        Ok(result)
    } else {
        Err(AppError::Generation(
            result
                .error
                .unwrap_or_else(|| "Generation failed".to_string()),
        ))
    }
}
