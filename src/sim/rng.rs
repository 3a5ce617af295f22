//! Seeded random stream for procedural generation

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use xxhash_rust::xxh3::xxh3_64;

use crate::seed::Seed;

/// Reproducible random stream derived from a seed string.
///
/// The seed string is hashed with xxh3, which is stable across platforms and
/// releases, so the same string always yields the same sequence.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed_value: u64,
    rng: Pcg32,
}

impl DeterministicRng {
    pub fn new(seed: &Seed) -> Self {
        let seed_value = xxh3_64(seed.as_str().as_bytes());
        Self {
            seed_value,
            rng: Pcg32::seed_from_u64(seed_value),
        }
    }

    /// Uniform integer in `[min, max]`, both ends inclusive
    pub fn between(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    /// Uniform float in `[0, 1)`
    pub fn frac(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Rewind to the start of the stream
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed_value);
    }
}
