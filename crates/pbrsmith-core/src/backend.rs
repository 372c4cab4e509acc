//! The diffusion backend seam.
//!
//! The generative model is an opaque collaborator: given a prompt and
//! inference parameters it produces an image, deterministically for a fixed
//! seed. This module defines the interface the pipeline needs from it and
//! nothing more; process management, model loading, and GPU concerns live
//! behind implementations of [`DiffusionBackend`].

use crate::buffer::TextureBuffer;

/// A single text-to-image inference request.
///
/// Constructed per call by the session; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    /// Full prompt, including any quality suffixes.
    pub prompt: String,
    /// Negative prompt, if the material defines one.
    pub negative_prompt: Option<String>,
    /// Number of inference steps.
    pub steps: u32,
    /// Guidance scale.
    pub guidance_scale: f64,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Seed for reproducible output. The backend is deterministic for a
    /// fixed (prompt, seed, steps, guidance, dimensions) tuple.
    pub seed: Option<u32>,
}

/// A generative text-to-image backend.
///
/// Implementations own the expensive model handle. `load` is called exactly
/// once per session before the first inference; `reclaim` is called after
/// every inference, success or failure, so sequential generations do not
/// accumulate transient memory.
pub trait DiffusionBackend {
    /// Initialize the backend (model load, warm-up). Called lazily, once.
    fn load(&mut self) -> Result<(), BackendError>;

    /// Run one inference and return the produced image.
    fn infer(&mut self, request: &InferenceRequest) -> Result<TextureBuffer, BackendError>;

    /// Release per-call transient resources. Default: nothing to release.
    fn reclaim(&mut self) {}
}

/// A type-erased backend failure.
///
/// Keeps the pipeline independent of concrete backend crates while
/// preserving the underlying error chain.
#[derive(Debug)]
pub struct BackendError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackendError {
    /// Create an error from a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
