//! Deterministic RNG wrapper using PCG32.
//!
//! All seeded noise in the pipeline goes through this module so that the
//! same seed and parameters produce byte-identical maps.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Wrapper around PCG32 for deterministic random number generation.
#[derive(Clone)]
pub struct DeterministicRng {
    inner: Pcg32,
}

impl DeterministicRng {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// The seed is expanded to 64 bits by duplicating the bits.
    pub fn new(seed: u32) -> Self {
        let seed64 = (seed as u64) | ((seed as u64) << 32);
        Self {
            inner: Pcg32::seed_from_u64(seed64),
        }
    }

    /// Derive a seed for a specific material using BLAKE3.
    ///
    /// Keeps a material's metallic-roughness map reproducible regardless of
    /// where it lands in a batch.
    pub fn derive_material_seed(base_seed: u32, material_key: &str) -> u32 {
        let mut input = Vec::with_capacity(4 + material_key.len());
        input.extend_from_slice(&base_seed.to_le_bytes());
        input.extend_from_slice(material_key.as_bytes());
        let hash = blake3::hash(&input);
        let bytes: [u8; 4] = hash.as_bytes()[0..4].try_into().unwrap();
        u32::from_le_bytes(bytes)
    }

    /// Generate a random value in the given range.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.inner.gen_range(range)
    }
}
