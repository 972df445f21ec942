//! Seed management for climate generation
//!
//! Each randomized subsystem gets its own seed, derived from a master seed by
//! default, so changing the biome jitter never perturbs the wind history.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for all climate generation systems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClimateSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Wind direction noise. Also used as the noise sampling offset.
    pub wind: u64,
    /// Spatial jitter of the elevation-banded biome scheme
    pub biomes: u64,
    /// Synthetic terrain for tools that run without a heightmap file
    pub terrain: u64,
}

impl ClimateSeeds {
    /// Create seeds from a master seed.
    ///
    /// The wind seed is the master seed itself so that a bare integer seed
    /// drives the wind noise directly; the other systems get derived seeds.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            wind: master,
            biomes: derive_seed(master, "biomes"),
            terrain: derive_seed(master, "terrain"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> ClimateSeedsBuilder {
        ClimateSeedsBuilder {
            seeds: Self::from_master(master),
        }
    }

    /// Fresh random stream for the biome jitter.
    pub fn biome_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.biomes)
    }
}

/// Builder for overriding individual seeds while deriving the rest
pub struct ClimateSeedsBuilder {
    seeds: ClimateSeeds,
}

impl ClimateSeedsBuilder {
    pub fn wind(mut self, seed: u64) -> Self {
        self.seeds.wind = seed;
        self
    }

    pub fn biomes(mut self, seed: u64) -> Self {
        self.seeds.biomes = seed;
        self
    }

    pub fn terrain(mut self, seed: u64) -> Self {
        self.seeds.terrain = seed;
        self
    }

    pub fn build(self) -> ClimateSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for ClimateSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ClimateSeeds {{ master: {}, wind: {}, biomes: {}, terrain: {} }}",
            self.master, self.wind, self.biomes, self.terrain,
        )
    }
}
