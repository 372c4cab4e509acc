//! Error types for the texture pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::backend::BackendError;
use crate::png::PngError;

/// Errors from derived-map synthesis.
///
/// These indicate a programming or data error and surface immediately;
/// they are never converted into per-item batch failures.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Input image or target has zero area.
    #[error("image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Normal-map strength must be positive.
    #[error("normal strength must be positive, got {0}")]
    InvalidStrength(f64),
}

/// Errors from a generation session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Backend could not be initialized. Fatal for the whole run.
    #[error("backend unavailable: {0}")]
    Unavailable(#[source] BackendError),

    /// A single backend generation failed.
    #[error("base color generation failed for '{material}': {source}")]
    Generation {
        material: String,
        #[source]
        source: BackendError,
    },

    /// A generated base color could not be written to its target.
    #[error("failed to write base color for '{material}' to {path}: {source}")]
    Write {
        material: String,
        path: PathBuf,
        #[source]
        source: PngError,
    },
}

/// The artifact being produced when a pipeline error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStage {
    BaseColor,
    Normal,
    MetallicRoughness,
}

impl ArtifactStage {
    /// File-name suffix for this artifact (`{key}_{suffix}.png`).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ArtifactStage::BaseColor => "BaseColor",
            ArtifactStage::Normal => "Normal",
            ArtifactStage::MetallicRoughness => "MetallicRoughness",
        }
    }
}

impl std::fmt::Display for ArtifactStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactStage::BaseColor => "base color",
            ArtifactStage::Normal => "normal",
            ArtifactStage::MetallicRoughness => "metallic-roughness",
        };
        write!(f, "{}", name)
    }
}

/// Errors from the per-material set orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Session-level failure (backend unavailable or generation failed).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Derived-map synthesis failed.
    #[error("{stage} synthesis failed for '{material}': {source}")]
    Synthesis {
        material: String,
        stage: ArtifactStage,
        #[source]
        source: SynthesisError,
    },

    /// Output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written.
    #[error("failed to write {stage} map for '{material}' to {path}: {source}")]
    WriteArtifact {
        material: String,
        stage: ArtifactStage,
        path: PathBuf,
        #[source]
        source: PngError,
    },
}
