//! Command implementations.

pub mod batch;
pub mod doctor;
pub mod materials;
pub mod single;

use pbrsmith_backend_sdxl::{SdxlBackend, SdxlConfig};
use pbrsmith_core::{GenerationSession, PbrSetOrchestrator, SessionConfig};

use crate::GenerateOptions;

/// Build an orchestrator from CLI options.
pub(crate) fn build_orchestrator(options: &GenerateOptions) -> PbrSetOrchestrator<SdxlBackend> {
    let backend = SdxlBackend::with_config(
        SdxlConfig::default()
            .timeout_secs(options.timeout)
            .allow_cpu(options.allow_cpu),
    );
    let session = GenerationSession::new(
        backend,
        SessionConfig {
            base_seed: options.seed,
            steps: options.steps,
            width: options.size,
            height: options.size,
            ..SessionConfig::default()
        },
    );
    PbrSetOrchestrator::new(session).with_normal_strength(options.strength)
}
