//! Generation session: owns the backend handle across a run.
//!
//! The backend is expensive to initialize and not safely shareable, so one
//! session owns it exclusively, loads it lazily on first use, and serializes
//! all generations through it. The session also derives a fresh seed for
//! every generation so no two calls within its lifetime reuse one.

use std::path::PathBuf;

use crate::backend::{DiffusionBackend, InferenceRequest};
use crate::buffer::TextureBuffer;
use crate::catalog::MaterialParams;
use crate::error::SessionError;
use crate::png::{self, PngConfig};

/// Fixed quality suffix appended to every material prompt.
pub const QUALITY_SUFFIX: &str = "photorealistic PBR texture, 4K quality, seamless tiling, \
     clean surface, no shadows, diffuse lighting";

/// Backend lifecycle within one session.
///
/// `Unloaded` is initial; the first generation drives the backend through
/// `Loading` to `Ready`. There is no transition back to `Unloaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loading,
    Ready,
}

/// Inference settings shared by every generation in a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base seed; generation n uses `base_seed + n`.
    pub base_seed: u32,
    /// Inference step count.
    pub steps: u32,
    /// Guidance scale.
    pub guidance_scale: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_seed: 42,
            steps: 30,
            guidance_scale: 7.5,
            width: 512,
            height: 512,
        }
    }
}

/// Result of one batch item. Same order and length as the input sequence.
#[derive(Debug)]
pub struct BatchItem {
    /// The material that was generated.
    pub material: MaterialParams,
    /// Where the base color was (to be) written.
    pub target: PathBuf,
    /// Per-item outcome; an error here never aborts the remaining items.
    pub outcome: Result<(), SessionError>,
}

impl BatchItem {
    /// Whether this item generated and wrote successfully.
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Owns a diffusion backend and tracks generation state for one run.
pub struct GenerationSession<B: DiffusionBackend> {
    backend: B,
    config: SessionConfig,
    state: SessionState,
    generation_count: u32,
}

impl<B: DiffusionBackend> GenerationSession<B> {
    /// Create a session. The backend is not touched until first use.
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            state: SessionState::Unloaded,
            generation_count: 0,
        }
    }

    /// Current backend lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of generations attempted so far.
    pub fn generation_count(&self) -> u32 {
        self.generation_count
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Load the backend if it is still unloaded. Blocks until ready.
    pub fn load(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Ready {
            return Ok(());
        }
        self.state = SessionState::Loading;
        self.backend.load().map_err(SessionError::Unavailable)?;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Generate a base-color image for one material.
    ///
    /// Builds the request from the material's prompts plus the fixed
    /// quality suffix and the session inference settings, assigns
    /// `seed = base_seed + generation_count`, then advances the counter.
    /// The counter advances on failure too: an attempted generation
    /// consumes its seed.
    pub fn generate_base_color(
        &mut self,
        material: &MaterialParams,
    ) -> Result<TextureBuffer, SessionError> {
        self.load()?;

        let seed = self.config.base_seed.wrapping_add(self.generation_count);
        self.generation_count += 1;

        let request = InferenceRequest {
            prompt: format!("{}, {}", material.prompt, QUALITY_SUFFIX),
            negative_prompt: Some(material.negative_prompt.to_string()),
            steps: self.config.steps,
            guidance_scale: self.config.guidance_scale,
            width: self.config.width,
            height: self.config.height,
            seed: Some(seed),
        };

        let result = self.backend.infer(&request);
        // Generation is memory-intensive; transient state goes before the
        // next call begins, whether this one succeeded or not.
        self.backend.reclaim();

        result.map_err(|source| SessionError::Generation {
            material: material.key.to_string(),
            source,
        })
    }

    /// Generate base colors for a sequence of (material, target) pairs.
    ///
    /// Items run strictly in order; a failure on one item is captured in
    /// its result and does not abort the remaining items. The returned
    /// sequence always has the same length and order as the input.
    pub fn generate_batch(&mut self, requests: &[(MaterialParams, PathBuf)]) -> Vec<BatchItem> {
        requests
            .iter()
            .map(|(material, target)| {
                let outcome = self.generate_base_color(material).and_then(|image| {
                    png::write_rgb(&image, target, &PngConfig::default()).map_err(|source| {
                        SessionError::Write {
                            material: material.key.to_string(),
                            path: target.clone(),
                            source,
                        }
                    })
                });
                BatchItem {
                    material: *material,
                    target: target.clone(),
                    outcome,
                }
            })
            .collect()
    }
}
