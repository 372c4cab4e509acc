//! pbrsmith texture derivation pipeline
//!
//! This crate turns a single generated base-color image into a complete PBR
//! texture set: base color, tangent-space normal map, and packed
//! metallic-roughness map. The base color itself comes from a diffusion
//! backend behind the [`DiffusionBackend`] trait; everything downstream of
//! that call is deterministic.
//!
//! # Pipeline
//!
//! ```text
//! DiffusionBackend::infer -> base color
//!     -> HeightFieldSampler -> NormalMapSynthesizer -> normal map
//! MaterialParams -> MetallicRoughnessSynthesizer -> metallic-roughness map
//! ```
//!
//! [`GenerationSession`] owns the backend handle for a whole run, derives a
//! fresh seed for every generation, and isolates per-item failures in batch
//! mode. [`PbrSetOrchestrator`] composes the pieces and writes the three
//! artifacts for one material.
//!
//! # Example
//!
//! ```no_run
//! use pbrsmith_core::{GenerationSession, PbrSetOrchestrator, SessionConfig};
//! # use pbrsmith_core::{DiffusionBackend, InferenceRequest, TextureBuffer, BackendError};
//! # struct Backend;
//! # impl DiffusionBackend for Backend {
//! #     fn load(&mut self) -> Result<(), BackendError> { unimplemented!() }
//! #     fn infer(&mut self, _: &InferenceRequest) -> Result<TextureBuffer, BackendError> {
//! #         unimplemented!()
//! #     }
//! # }
//! # let backend = Backend;
//! let session = GenerationSession::new(backend, SessionConfig::default());
//! let mut orchestrator = PbrSetOrchestrator::new(session);
//! let set = orchestrator.generate_set("hull_plating", "assets/textures".as_ref()).unwrap();
//! println!("wrote {}", set.normal.display());
//! ```
//!
//! # Determinism
//!
//! Derived maps are byte-identical given the same input and seed: the
//! metallic-roughness noise runs on PCG32, the normal-map encoding is
//! specified to the rounding step, and PNG encoding uses fixed compression
//! settings.

pub mod backend;
pub mod buffer;
pub mod catalog;
pub mod color;
pub mod error;
pub mod height_field;
pub mod metallic_roughness;
pub mod normal_map;
pub mod orchestrator;
pub mod png;
pub mod rng;
pub mod session;

// Re-export main types for convenience
pub use backend::{BackendError, DiffusionBackend, InferenceRequest};
pub use buffer::{GrayscaleBuffer, TextureBuffer};
pub use catalog::MaterialParams;
pub use color::Color;
pub use error::{ArtifactStage, PipelineError, SessionError, SynthesisError};
pub use height_field::HeightFieldSampler;
pub use metallic_roughness::MetallicRoughnessSynthesizer;
pub use normal_map::NormalMapSynthesizer;
pub use orchestrator::{PbrSetOrchestrator, PbrTextureSet};
pub use png::{PngConfig, PngError};
pub use rng::DeterministicRng;
pub use session::{BatchItem, GenerationSession, SessionConfig, SessionState};
