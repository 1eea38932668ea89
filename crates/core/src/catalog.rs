//! Read-only views over output directories.
//!
//! Both functions degrade to an empty/`None` result instead of failing:
//! a missing directory simply means nothing has been generated yet.

use std::path::Path;

use serde_json::Value;

use crate::naming::metadata_path_for;

/// Filenames in `dir` ending in `.{extension}`, sorted by name.
///
/// Returns an empty list when the directory is missing or unreadable.
pub async fn list_files_with_extension(dir: &Path, extension: &str) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Output directory not readable");
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let matches = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
                let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
                if matches && is_file {
                    files.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                break;
            }
        }
    }

    files.sort();
    files
}

/// Parse the metadata sidecar of `output_path`.
///
/// Returns `None` if the sidecar is missing or is not valid JSON.
pub async fn read_metadata(output_path: &Path) -> Option<Value> {
    let metadata_path = metadata_path_for(output_path);
    let contents = tokio::fs::read(&metadata_path).await.ok()?;
    match serde_json::from_slice(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                path = %metadata_path.display(),
                error = %e,
                "Ignoring invalid metadata file",
            );
            None
        }
    }
}

/// Whether `path` exists and is a regular file.
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}
