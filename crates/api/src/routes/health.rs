use std::path::Path;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Warning threshold: 80% disk usage.
const DISK_WARNING_THRESHOLD: f64 = 0.8;
/// Critical threshold: 90% disk usage.
const DISK_CRITICAL_THRESHOLD: f64 = 0.9;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` when storage is missing or the disk is critical.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub storage: StorageHealth,
    pub disk: Option<DiskStats>,
    /// Resident set size of this process, if it could be read.
    pub memory_rss_bytes: Option<u64>,
    pub jobs: JobStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageHealth {
    pub root: String,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_pct: f64,
    pub warning_threshold: f64,
    pub critical_threshold: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub active: usize,
    pub max: usize,
}

/// GET /health -- storage, disk, memory and job-slot health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let root = state.config.storage_root.clone();
    let exists = tokio::fs::metadata(&root)
        .await
        .is_ok_and(|m| m.is_dir());

    let disk_root = root.clone();
    let disk = tokio::task::spawn_blocking(move || disk_stats(&disk_root))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Disk stats task failed");
            None
        });

    let memory_rss_bytes = resident_memory_bytes().await;

    let disk_critical = disk
        .as_ref()
        .is_some_and(|d| d.usage_pct >= DISK_CRITICAL_THRESHOLD);
    let status = if exists && !disk_critical { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage: StorageHealth {
            root: root.display().to_string(),
            exists,
        },
        disk,
        memory_rss_bytes,
        jobs: JobStats {
            active: state.limiter.active_jobs(),
            max: state.limiter.max_jobs(),
        },
    })
}

/// Disk usage of the filesystem holding `path`, via `statvfs`.
fn disk_stats(path: &Path) -> Option<DiskStats> {
    #[cfg(unix)]
    {
        use std::ffi::CString;
        use std::mem::MaybeUninit;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
        let mut stat = MaybeUninit::<libc::statvfs>::uninit();

        // Safety: `c_path` is a valid NUL-terminated string and `stat` is
        // only read after a successful call.
        let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if ret != 0 {
            return None;
        }
        let stat = unsafe { stat.assume_init() };

        let block_size = stat.f_frsize as u64;
        let total = stat.f_blocks as u64 * block_size;
        let free = stat.f_bavail as u64 * block_size;
        let used = total.saturating_sub(free);
        let usage_pct = if total == 0 {
            0.0
        } else {
            used as f64 / total as f64
        };

        Some(DiskStats {
            total_bytes: total,
            used_bytes: used,
            free_bytes: free,
            usage_pct,
            warning_threshold: DISK_WARNING_THRESHOLD,
            critical_threshold: DISK_CRITICAL_THRESHOLD,
        })
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        None
    }
}

/// Resident memory from `/proc/self/statm` (Linux only).
async fn resident_memory_bytes() -> Option<u64> {
    let statm = tokio::fs::read_to_string("/proc/self/statm").await.ok()?;
    let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;

    #[cfg(unix)]
    let page_size = {
        // Safety: sysconf has no memory-safety preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        u64::try_from(size).ok()?
    };
    #[cfg(not(unix))]
    let page_size = 4096;

    Some(resident_pages * page_size)
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
