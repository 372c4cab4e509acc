//! Per-material set orchestration: base color in, three artifacts out.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::DiffusionBackend;
use crate::catalog;
use crate::error::{ArtifactStage, PipelineError, SynthesisError};
use crate::height_field::HeightFieldSampler;
use crate::metallic_roughness::MetallicRoughnessSynthesizer;
use crate::normal_map::{NormalMapSynthesizer, DEFAULT_STRENGTH};
use crate::png::{self, PngConfig};
use crate::rng::DeterministicRng;
use crate::session::GenerationSession;

/// The three written artifacts for one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbrTextureSet {
    /// Material key the set was requested under.
    pub material: String,
    /// Base color artifact path.
    pub base_color: PathBuf,
    /// Normal map artifact path.
    pub normal: PathBuf,
    /// Metallic-roughness artifact path.
    pub metallic_roughness: PathBuf,
}

/// Composes the session, samplers, and synthesizers into complete sets.
pub struct PbrSetOrchestrator<B: DiffusionBackend> {
    session: GenerationSession<B>,
    sampler: HeightFieldSampler,
    normal_strength: f64,
    png: PngConfig,
}

impl<B: DiffusionBackend> PbrSetOrchestrator<B> {
    /// Create an orchestrator around a session.
    pub fn new(session: GenerationSession<B>) -> Self {
        Self {
            session,
            sampler: HeightFieldSampler::new(),
            normal_strength: DEFAULT_STRENGTH,
            png: PngConfig::default(),
        }
    }

    /// Set the normal-map bump strength.
    pub fn with_normal_strength(mut self, strength: f64) -> Self {
        self.normal_strength = strength;
        self
    }

    /// The underlying session.
    pub fn session(&self) -> &GenerationSession<B> {
        &self.session
    }

    /// Generate and write the full texture set for one material key.
    ///
    /// Unknown keys use the catalog's default parameters but keep the
    /// requested key in file names, so free-form keys still produce a
    /// usable set. Base-color failure aborts the whole set; the derived
    /// maps cannot be meaningfully produced without it.
    pub fn generate_set(
        &mut self,
        key: &str,
        out_dir: &Path,
    ) -> Result<PbrTextureSet, PipelineError> {
        let material = catalog::resolve(key);

        fs::create_dir_all(out_dir).map_err(|source| PipelineError::CreateDir {
            path: out_dir.to_path_buf(),
            source,
        })?;

        // Base color from the backend
        let base_color = self.session.generate_base_color(&material)?;
        let base_color_path = self.artifact_path(out_dir, key, ArtifactStage::BaseColor);
        png::write_rgb(&base_color, &base_color_path, &self.png).map_err(|source| {
            PipelineError::WriteArtifact {
                material: key.to_string(),
                stage: ArtifactStage::BaseColor,
                path: base_color_path.clone(),
                source,
            }
        })?;

        // Normal map derived from the base color's height field
        let normal = self
            .sampler
            .sample(&base_color)
            .and_then(|field| {
                NormalMapSynthesizer::new()
                    .with_strength(self.normal_strength)
                    .synthesize(&field)
            })
            .map_err(|source| self.synthesis_error(key, ArtifactStage::Normal, source))?;
        let normal_path = self.artifact_path(out_dir, key, ArtifactStage::Normal);
        png::write_rgb(&normal, &normal_path, &self.png).map_err(|source| {
            PipelineError::WriteArtifact {
                material: key.to_string(),
                stage: ArtifactStage::Normal,
                path: normal_path.clone(),
                source,
            }
        })?;

        // Metallic-roughness from catalog parameters alone; the seed is
        // derived from the material key so the map does not depend on
        // batch position
        let config = self.session.config();
        let mr_seed = DeterministicRng::derive_material_seed(config.base_seed, key);
        let (width, height) = (config.width, config.height);
        let metallic_roughness = MetallicRoughnessSynthesizer::new(&material)
            .synthesize(width, height, Some(mr_seed))
            .map_err(|source| {
                self.synthesis_error(key, ArtifactStage::MetallicRoughness, source)
            })?;
        let metallic_roughness_path =
            self.artifact_path(out_dir, key, ArtifactStage::MetallicRoughness);
        png::write_rgb(&metallic_roughness, &metallic_roughness_path, &self.png).map_err(
            |source| PipelineError::WriteArtifact {
                material: key.to_string(),
                stage: ArtifactStage::MetallicRoughness,
                path: metallic_roughness_path.clone(),
                source,
            },
        )?;

        Ok(PbrTextureSet {
            material: key.to_string(),
            base_color: base_color_path,
            normal: normal_path,
            metallic_roughness: metallic_roughness_path,
        })
    }

    fn artifact_path(&self, out_dir: &Path, key: &str, stage: ArtifactStage) -> PathBuf {
        out_dir.join(format!("{}_{}.png", key, stage.file_suffix()))
    }

    fn synthesis_error(
        &self,
        key: &str,
        stage: ArtifactStage,
        source: SynthesisError,
    ) -> PipelineError {
        PipelineError::Synthesis {
            material: key.to_string(),
            stage,
            source,
        }
    }
}
