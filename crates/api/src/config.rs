use std::path::PathBuf;
use std::time::Duration;

use burntbeats_core::scripting::limiter::DEFAULT_MAX_JOBS;
use burntbeats_core::scripting::python::DEFAULT_INTERPRETER;
use burntbeats_core::services::audioldm2::DEFAULT_MODEL_PATH;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Must outlast the generation timeout.
    pub request_timeout_secs: u64,
    /// Root under which generated artifacts are stored and served.
    pub storage_root: PathBuf,
    /// Staging directory for uploaded voice samples. Never served; keep it
    /// outside `storage_root`.
    pub upload_dir: PathBuf,
    /// Interpreter used to launch the generation scripts.
    pub python_bin: String,
    pub midi_script: PathBuf,
    pub rvc_script: PathBuf,
    pub audioldm2_script: PathBuf,
    /// Model name or path handed to the AudioLDM2 script.
    pub audioldm2_model_path: String,
    /// Upper bound on concurrently running generation processes.
    pub max_concurrent_jobs: usize,
    /// Per-job timeout in seconds; `0` disables it.
    pub generation_timeout_secs: u64,
    /// Maximum accepted request body (voice sample uploads).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                        |
    /// |---------------------------|------------------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                                      |
    /// | `PORT`                    | `5000`                                         |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`                        |
    /// | `REQUEST_TIMEOUT_SECS`    | `900`                                          |
    /// | `STORAGE_ROOT`            | `./storage`                                    |
    /// | `UPLOAD_DIR`              | `./uploads`                                    |
    /// | `PYTHON_BIN`              | `python3`                                      |
    /// | `MIDI_SCRIPT`             | `server/enhanced-midi-generator.py`            |
    /// | `RVC_SCRIPT`              | `server/rvc-integration.py`                    |
    /// | `AUDIOLDM2_SCRIPT`        | `temp-dreamsound-repo/inference_audioldm2.py`  |
    /// | `AUDIOLDM2_MODEL_PATH`    | `cvssp/audioldm2-music`                        |
    /// | `MAX_CONCURRENT_JOBS`     | `4`                                            |
    /// | `GENERATION_TIMEOUT_SECS` | `600`                                          |
    /// | `MAX_UPLOAD_BYTES`        | `52428800` (50 MiB)                            |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "5000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "900")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_concurrent_jobs: usize = env_or("MAX_CONCURRENT_JOBS", &DEFAULT_MAX_JOBS.to_string())
            .parse()
            .expect("MAX_CONCURRENT_JOBS must be a valid usize");

        let generation_timeout_secs: u64 = env_or("GENERATION_TIMEOUT_SECS", "600")
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", "52428800")
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage_root: PathBuf::from(env_or("STORAGE_ROOT", "./storage")),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "./uploads")),
            python_bin: env_or("PYTHON_BIN", DEFAULT_INTERPRETER),
            midi_script: PathBuf::from(env_or("MIDI_SCRIPT", "server/enhanced-midi-generator.py")),
            rvc_script: PathBuf::from(env_or("RVC_SCRIPT", "server/rvc-integration.py")),
            audioldm2_script: PathBuf::from(env_or(
                "AUDIOLDM2_SCRIPT",
                "temp-dreamsound-repo/inference_audioldm2.py",
            )),
            audioldm2_model_path: env_or("AUDIOLDM2_MODEL_PATH", DEFAULT_MODEL_PATH),
            max_concurrent_jobs,
            generation_timeout_secs,
            max_upload_bytes,
        }
    }

    /// `{storage_root}/midi/generated`
    pub fn midi_output_dir(&self) -> PathBuf {
        self.storage_root.join("midi").join("generated")
    }

    /// `{storage_root}/voices`
    pub fn voice_output_dir(&self) -> PathBuf {
        self.storage_root.join("voices")
    }

    /// `{storage_root}/music/generated`
    pub fn music_output_dir(&self) -> PathBuf {
        self.storage_root.join("music").join("generated")
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        (self.generation_timeout_secs > 0).then(|| Duration::from_secs(self.generation_timeout_secs))
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            storage_root: PathBuf::from("/srv/storage"),
            upload_dir: PathBuf::from("/srv/uploads"),
            python_bin: "python3".to_string(),
            midi_script: PathBuf::from("midi.py"),
            rvc_script: PathBuf::from("rvc.py"),
            audioldm2_script: PathBuf::from("ldm.py"),
            audioldm2_model_path: DEFAULT_MODEL_PATH.to_string(),
            max_concurrent_jobs: 2,
            generation_timeout_secs: 0,
            max_upload_bytes: 1024,
        }
    }

    #[test]
    fn output_dirs_follow_storage_layout() {
        let c = config();
        assert_eq!(c.midi_output_dir(), PathBuf::from("/srv/storage/midi/generated"));
        assert_eq!(c.voice_output_dir(), PathBuf::from("/srv/storage/voices"));
        assert_eq!(c.music_output_dir(), PathBuf::from("/srv/storage/music/generated"));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let mut c = config();
        assert_eq!(c.generation_timeout(), None);
        c.generation_timeout_secs = 5;
        assert_eq!(c.generation_timeout(), Some(Duration::from_secs(5)));
    }
}
