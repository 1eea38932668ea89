//! MIDI generation service.
//!
//! Wraps the MIDI generator script:
//!
//! ```text
//! {python} {script} --title=T --theme=T --genre=G --tempo=N --output=PATH
//!          [--duration=S] [--voice-id=V] [--ai-lyrics]
//! ```
//!
//! The script writes `PATH` plus a `{stem}_metadata.json` sidecar.

use std::path::Path;

use serde_json::Value;

use super::{flag, ProcessInvocation};
use crate::catalog;
use crate::generation::{GenerationResult, GenerationService};
use crate::naming::{metadata_path_for, sanitize_name};

/// Extension of generated MIDI files.
pub const MIDI_EXTENSION: &str = "mid";

/// Input for one MIDI generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiRequest {
    pub title: String,
    pub theme: String,
    pub genre: String,
    pub tempo: u32,
    /// Target length in seconds.
    pub duration: Option<u32>,
    pub use_ai_lyrics: bool,
    pub voice_id: Option<String>,
}

impl MidiRequest {
    /// Script arguments for this request, writing to `output`.
    fn to_args(&self, output: &Path) -> Vec<String> {
        let mut args = vec![
            flag("--title", &self.title),
            flag("--theme", &self.theme),
            flag("--genre", &self.genre),
            flag("--tempo", self.tempo),
            flag("--output", output.display()),
        ];
        if let Some(duration) = self.duration {
            args.push(flag("--duration", duration));
        }
        if let Some(voice_id) = &self.voice_id {
            args.push(flag("--voice-id", voice_id));
        }
        if self.use_ai_lyrics {
            args.push("--ai-lyrics".to_string());
        }
        args
    }
}

/// Generates MIDI files named after the sanitized song title.
#[derive(Debug)]
pub struct MidiService {
    invocation: ProcessInvocation,
}

impl MidiService {
    pub fn new(invocation: ProcessInvocation) -> Self {
        Self { invocation }
    }

    pub fn output_dir(&self) -> &Path {
        self.invocation.output_dir()
    }
}

impl GenerationService for MidiService {
    type Request = MidiRequest;

    async fn generate(&self, request: MidiRequest) -> GenerationResult {
        if let Err(e) = self.invocation.ensure_output_dir().await {
            return e.into();
        }

        let output = self
            .invocation
            .next_output_path(&sanitize_name(&request.title), MIDI_EXTENSION);
        let args = request.to_args(&output);

        tracing::info!(
            title = %request.title,
            genre = %request.genre,
            tempo = request.tempo,
            output = %output.display(),
            "Generating MIDI",
        );

        match self.invocation.run_expecting(&args, &output).await {
            Ok(_) => {
                let metadata = metadata_path_for(&output);
                let metadata_path = catalog::file_exists(&metadata).await.then_some(metadata);
                tracing::info!(output = %output.display(), "MIDI generated");
                GenerationResult::succeeded(output, metadata_path)
            }
            Err(e) => {
                tracing::error!(title = %request.title, error = %e, "MIDI generation failed");
                e.into()
            }
        }
    }

    async fn list_generated(&self) -> Vec<String> {
        self.invocation.list_generated(MIDI_EXTENSION).await
    }

    async fn get_metadata(&self, output_path: &Path) -> Option<Value> {
        catalog::read_metadata(output_path).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripting::limiter::JobLimiter;
    use crate::scripting::python::PythonRunner;
    use crate::scripting::test_helpers::write_temp_script;
    use crate::services::test_helpers::{bash_invocation, echo_args_to, STRICT_OPTIONS_ONLY};

    /// Fake generator: writes the MIDI file and a metadata sidecar.
    const FAKE_GENERATOR: &str = r#"out=""
for arg in "$@"; do
  case "$arg" in
    --output=*) out="${arg#--output=}" ;;
  esac
done
echo "MThd" > "$out"
echo '{"title": "My Song!", "tempo": 120}' > "${out%.mid}_metadata.json"
echo "MIDI generation completed successfully"
"#;

    fn request() -> MidiRequest {
        MidiRequest {
            title: "My Song!".to_string(),
            theme: "dreamy".to_string(),
            genre: "pop".to_string(),
            tempo: 120,
            duration: None,
            use_ai_lyrics: false,
            voice_id: None,
        }
    }

    #[test]
    fn args_follow_flag_value_then_toggles() {
        let req = MidiRequest {
            duration: Some(30),
            use_ai_lyrics: true,
            voice_id: Some("v1".to_string()),
            ..request()
        };
        let args = req.to_args(Path::new("/out/x.mid"));
        assert_eq!(
            args,
            vec![
                "--title=My Song!",
                "--theme=dreamy",
                "--genre=pop",
                "--tempo=120",
                "--output=/out/x.mid",
                "--duration=30",
                "--voice-id=v1",
                "--ai-lyrics",
            ]
        );
    }

    #[test]
    fn optional_args_are_omitted() {
        let args = request().to_args(Path::new("/out/x.mid"));
        assert!(!args
            .iter()
            .any(|a| a.starts_with("--duration") || a == "--ai-lyrics"));
    }

    #[tokio::test]
    async fn dash_leading_title_stays_a_single_value() {
        let dir = tempfile::tempdir().expect("temp dir");
        let body = format!("{STRICT_OPTIONS_ONLY}{}", echo_args_to("--output"));
        let script = write_temp_script(&body);
        let service = MidiService::new(bash_invocation(script.path(), dir.path()));

        let req = MidiRequest {
            title: "-Intro-".to_string(),
            theme: "--dark".to_string(),
            ..request()
        };
        let result = service.generate(req).await;
        assert!(result.success, "unexpected failure: {:?}", result.error);

        let written = std::fs::read_to_string(result.output_path.expect("path")).expect("read");
        assert!(written.lines().any(|l| l == "--title=-Intro-"));
        assert!(written.lines().any(|l| l == "--theme=--dark"));
    }

    #[tokio::test]
    async fn successful_generation_reports_paths() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script(FAKE_GENERATOR);
        let service = MidiService::new(bash_invocation(script.path(), dir.path()));

        let result = service.generate(request()).await;
        assert!(result.success, "unexpected failure: {:?}", result.error);

        let output = result.output_path.expect("output path");
        let name = output.file_name().expect("file name").to_string_lossy().into_owned();
        assert!(name.starts_with("My_Song__"), "got {name}");
        assert!(name.ends_with(".mid"));
        assert!(output.is_file());

        let metadata = result.metadata_path.expect("metadata path");
        assert!(metadata.to_string_lossy().ends_with("_metadata.json"));

        let parsed = service.get_metadata(&output).await.expect("metadata");
        assert_eq!(parsed["tempo"], 120);
        assert_eq!(service.list_generated().await, vec![name]);
    }

    #[tokio::test]
    async fn zero_exit_without_output_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script("echo 'MIDI generation completed successfully'\n");
        let service = MidiService::new(bash_invocation(script.path(), dir.path()));

        let result = service.generate(request()).await;
        assert!(!result.success);
        assert!(result.error.expect("error").contains("not generated"));
    }

    #[tokio::test]
    async fn non_zero_exit_reports_code_and_stderr() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script("echo 'chords2midi missing' >&2\nexit 7\n");
        let service = MidiService::new(bash_invocation(script.path(), dir.path()));

        let result = service.generate(request()).await;
        assert!(!result.success);
        let error = result.error.expect("error");
        assert!(error.contains('7'), "{error}");
        assert!(error.contains("chords2midi missing"), "{error}");
    }

    #[tokio::test]
    async fn missing_interpreter_reports_spawn_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script("exit 0\n");
        let runner = PythonRunner::new("/nonexistent/python3", JobLimiter::new(1));
        let service = MidiService::new(ProcessInvocation::new(runner, script.path(), dir.path()));

        let result = service.generate(request()).await;
        assert!(!result.success);
        assert!(result
            .error
            .expect("error")
            .starts_with("Failed to start process:"));
    }

    #[tokio::test]
    async fn output_dir_exists_after_failed_call() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("midi/generated");
        let script = write_temp_script("exit 1\n");
        let service = MidiService::new(bash_invocation(script.path(), &out));

        assert!(!out.exists());
        let result = service.generate(request()).await;
        assert!(!result.success);
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn concurrent_same_title_gets_distinct_paths() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script(FAKE_GENERATOR);
        let service = MidiService::new(bash_invocation(script.path(), dir.path()));

        let (a, b) = tokio::join!(service.generate(request()), service.generate(request()));
        assert!(a.success && b.success);
        assert_ne!(a.output_path, b.output_path);
    }

    #[tokio::test]
    async fn ai_lyrics_flag_reaches_script() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script(&echo_args_to("--output"));
        let service = MidiService::new(bash_invocation(script.path(), dir.path()));

        let req = MidiRequest {
            use_ai_lyrics: true,
            ..request()
        };
        let result = service.generate(req).await;
        assert!(result.success);
        // No sidecar was written, so no metadata path is reported.
        assert!(result.metadata_path.is_none());

        let written = std::fs::read_to_string(result.output_path.expect("path")).expect("read");
        assert!(written.lines().any(|l| l == "--ai-lyrics"));
    }

    #[tokio::test]
    async fn list_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = write_temp_script("exit 0\n");
        let service = MidiService::new(bash_invocation(script.path(), &dir.path().join("none")));
        assert!(service.list_generated().await.is_empty());
    }
}
