#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use burntbeats_api::config::ServerConfig;
use burntbeats_api::router::build_app_router;
use burntbeats_api::state::AppState;
use burntbeats_core::services::audioldm2::DEFAULT_MODEL_PATH;

/// Stand-in for all three generator scripts, run with `bash`.
///
/// Writes a small file at the `--output=` / `--output_file=` path, a
/// metadata sidecar for `.mid` outputs, and answers `--action=list` with one
/// voice.
pub const FAKE_GENERATOR: &str = r#"out=""
action=""
for arg in "$@"; do
  case "$arg" in
    --output=*) out="${arg#--output=}" ;;
    --output_file=*) out="${arg#--output_file=}" ;;
    --action=*) action="${arg#--action=}" ;;
  esac
done
if [ "$action" = "list" ]; then
  echo '[{"voice_id":"alto","name":"Alto","has_embedding":true}]'
  exit 0
fi
printf 'fake-audio' > "$out"
case "$out" in
  *.mid) printf '{"title":"fake","tempo":120}' > "${out%.mid}_metadata.json" ;;
esac
"#;

/// Generator that always fails with a message on stderr.
pub const FAILING_GENERATOR: &str = "echo 'model weights missing' >&2\nexit 3\n";

/// Generator that exits 0 without producing anything.
pub const SILENT_GENERATOR: &str = "exit 0\n";

/// Temporary storage root, upload dir and generator script for one test.
///
/// Layout: `{dir}/generator.sh`, `{dir}/storage`, `{dir}/uploads`.
pub struct TestEnv {
    pub dir: TempDir,
    pub config: ServerConfig,
}

impl TestEnv {
    /// Every generator runs `script_body` through `bash`.
    pub fn new(script_body: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let script = dir.path().join("generator.sh");
        std::fs::write(&script, format!("#!/bin/bash\n{script_body}")).expect("write script");

        let config = test_config(dir.path(), script);
        std::fs::create_dir_all(&config.storage_root).expect("create storage root");
        Self { dir, config }
    }

    pub fn storage_root(&self) -> PathBuf {
        self.config.storage_root.clone()
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir.clone()
    }

    pub fn app(&self) -> Router {
        build_app_router(AppState::from_config(self.config.clone()))
    }
}

/// Build a test `ServerConfig` rooted at `base` whose generators all point
/// at `script`.
pub fn test_config(base: &Path, script: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage_root: base.join("storage"),
        upload_dir: base.join("uploads"),
        python_bin: "bash".to_string(),
        midi_script: script.clone(),
        rvc_script: script.clone(),
        audioldm2_script: script,
        audioldm2_model_path: DEFAULT_MODEL_PATH.to_string(),
        max_concurrent_jobs: 2,
        generation_timeout_secs: 10,
        max_upload_bytes: 1024 * 1024,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
