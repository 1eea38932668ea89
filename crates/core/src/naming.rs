//! Output file naming conventions.
//!
//! Every artifact written by an external script gets a name of the form
//! `{stem}_{millis}.{ext}`. The stem is either a fixed prefix
//! (`cloned_voice`, `generated`) or a sanitized user-supplied title.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::CoreError;

/// Suffix appended to an artifact stem to locate its metadata sidecar.
pub const METADATA_SUFFIX: &str = "_metadata.json";

/// Replace every character outside `[A-Za-z0-9]` with `_`.
///
/// # Examples
///
/// ```
/// use burntbeats_core::naming::sanitize_name;
///
/// assert_eq!(sanitize_name("My Song!"), "My_Song_");
/// assert_eq!(sanitize_name("lo-fi beat"), "lo_fi_beat");
/// ```
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Build `{stem}_{stamp}.{extension}`.
pub fn timestamped_filename(stem: &str, stamp: i64, extension: &str) -> String {
    format!("{stem}_{stamp}.{extension}")
}

/// Path of the metadata sidecar for an artifact.
///
/// `dir/song_1.mid` maps to `dir/song_1_metadata.json`.
pub fn metadata_path_for(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_path.with_file_name(format!("{stem}{METADATA_SUFFIX}"))
}

/// Reject filenames that could escape their directory.
///
/// Used for route parameters that name a file inside an output directory.
pub fn validate_filename(filename: &str) -> Result<(), CoreError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0')
    {
        return Err(CoreError::Validation(format!(
            "Invalid filename '{filename}'"
        )));
    }
    Ok(())
}

/// Millisecond timestamp source that never hands out the same value twice.
///
/// Two calls landing in the same millisecond get consecutive values, so
/// concurrent requests with identical titles still map to distinct files.
#[derive(Debug, Default)]
pub struct MillisClock {
    last: AtomicI64,
}

impl MillisClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp: the current wall-clock millis, or one past the previous
    /// stamp if the clock has not advanced.
    pub fn next(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}
