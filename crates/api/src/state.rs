use std::sync::Arc;

use burntbeats_core::scripting::limiter::JobLimiter;
use burntbeats_core::scripting::python::PythonRunner;
use burntbeats_core::services::audioldm2::AudioLdm2Service;
use burntbeats_core::services::midi::MidiService;
use burntbeats_core::services::voice::VoiceCloneService;
use burntbeats_core::services::ProcessInvocation;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once in `main` (or per test) and passed explicitly; there are no
/// module-level singletons. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Concurrency limiter shared by all generation services.
    pub limiter: JobLimiter,
    pub midi: Arc<MidiService>,
    pub voice: Arc<VoiceCloneService>,
    pub audioldm2: Arc<AudioLdm2Service>,
}

impl AppState {
    /// Wire the three generation services from configuration.
    pub fn from_config(config: ServerConfig) -> Self {
        let limiter = JobLimiter::new(config.max_concurrent_jobs);
        let runner = PythonRunner::new(config.python_bin.clone(), limiter.clone())
            .with_timeout(config.generation_timeout());

        let midi = MidiService::new(ProcessInvocation::new(
            runner.clone(),
            &config.midi_script,
            config.midi_output_dir(),
        ));
        let voice = VoiceCloneService::new(
            ProcessInvocation::new(runner.clone(), &config.rvc_script, config.voice_output_dir()),
            config.upload_dir.clone(),
        );
        let audioldm2 = AudioLdm2Service::new(
            ProcessInvocation::new(runner, &config.audioldm2_script, config.music_output_dir()),
            config.audioldm2_model_path.clone(),
        );

        Self {
            config: Arc::new(config),
            limiter,
            midi: Arc::new(midi),
            voice: Arc::new(voice),
            audioldm2: Arc::new(audioldm2),
        }
    }
}
