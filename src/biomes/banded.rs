//! Elevation-banded biomes
//!
//! Elevation picks the band; average rain splits plains into wet and dry
//! and marks bone-dry hills as rocky. Rocky hills are kept away from the map
//! edge by a margin test with a small random jitter per comparison.

use rand::Rng;

use super::BiomeKind;
use crate::params::BiomeParams;
use crate::tilemap::Tilemap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum BandedBiome {
    Water = 0,
    SandyBeach = 1,
    GravelBeach = 2,
    StonyCliffs = 3,
    WetPlains = 4,
    DryPlains = 5,
    RockyHills = 6,
    TemperateForest = 7,
    BorealForest = 8,
    MountainTundra = 9,
    MountainPeak = 10,
}

impl BiomeKind for BandedBiome {
    const ALL: &'static [Self] = &[
        BandedBiome::Water,
        BandedBiome::SandyBeach,
        BandedBiome::GravelBeach,
        BandedBiome::StonyCliffs,
        BandedBiome::WetPlains,
        BandedBiome::DryPlains,
        BandedBiome::RockyHills,
        BandedBiome::TemperateForest,
        BandedBiome::BorealForest,
        BandedBiome::MountainTundra,
        BandedBiome::MountainPeak,
    ];

    fn id(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            BandedBiome::Water => "Water",
            BandedBiome::SandyBeach => "Sandy Beach",
            BandedBiome::GravelBeach => "Gravel Beach",
            BandedBiome::StonyCliffs => "Stony Beach Cliffs",
            BandedBiome::WetPlains => "Wet Plains",
            BandedBiome::DryPlains => "Dry Plains",
            BandedBiome::RockyHills => "Rocky Hills",
            BandedBiome::TemperateForest => "Temperate Forest",
            BandedBiome::BorealForest => "Boreal Forest",
            BandedBiome::MountainTundra => "Mountain Tundra",
            BandedBiome::MountainPeak => "Mountain Peak",
        }
    }

    fn color(self) -> (u8, u8, u8) {
        match self {
            BandedBiome::Water => (30, 60, 120),
            BandedBiome::SandyBeach => (230, 215, 160),
            BandedBiome::GravelBeach => (170, 160, 140),
            BandedBiome::StonyCliffs => (120, 115, 110),
            BandedBiome::WetPlains => (110, 160, 70),
            BandedBiome::DryPlains => (180, 175, 100),
            BandedBiome::RockyHills => (140, 130, 115),
            BandedBiome::TemperateForest => (40, 100, 40),
            BandedBiome::BorealForest => (50, 80, 50),
            BandedBiome::MountainTundra => (180, 190, 170),
            BandedBiome::MountainPeak => (255, 255, 255),
        }
    }
}

/// Classify one cell.
///
/// `jitter` is only drawn from for dry hills, so the random stream advances
/// the same way for identical inputs.
pub fn classify_cell<R: Rng>(
    elevation: f32,
    avg_rain: f32,
    x: usize,
    y: usize,
    extent: (usize, usize),
    params: &BiomeParams,
    jitter: &mut R,
) -> BandedBiome {
    let p = params;
    if elevation <= p.water {
        BandedBiome::Water
    } else if elevation <= p.sandy_beach {
        BandedBiome::SandyBeach
    } else if elevation <= p.gravel_beach {
        BandedBiome::GravelBeach
    } else if elevation <= p.beach_cliffs {
        BandedBiome::StonyCliffs
    } else if elevation <= p.plains {
        if avg_rain >= p.wet_plains_rain {
            BandedBiome::WetPlains
        } else {
            BandedBiome::DryPlains
        }
    } else if elevation <= p.hills {
        if avg_rain < p.rocky_hills_rain && away_from_edge(x, y, extent, p.jitter_margin, jitter) {
            BandedBiome::RockyHills
        } else if elevation <= p.temperate_forest {
            BandedBiome::TemperateForest
        } else {
            BandedBiome::BorealForest
        }
    } else if elevation <= p.mountain_tundra {
        BandedBiome::MountainTundra
    } else {
        BandedBiome::MountainPeak
    }
}

/// Margin test; each of the four comparisons draws its own offset in `-2..2`.
fn away_from_edge<R: Rng>(x: usize, y: usize, (width, height): (usize, usize), margin: i64, rng: &mut R) -> bool {
    let (x, y) = (x as i64, y as i64);
    let (w, h) = (width as i64, height as i64);
    let mut jitter = || rng.gen_range(-2..2i64);
    x + jitter() > margin && x + jitter() < w - margin && y + jitter() > margin && y + jitter() < h - margin
}

/// Classify a whole map, visiting cells in storage order.
pub fn classify_banded<R: Rng>(
    heightmap: &Tilemap<f32>,
    avg_rain: &Tilemap<f32>,
    params: &BiomeParams,
    rng: &mut R,
) -> Tilemap<BandedBiome> {
    debug_assert!(heightmap.same_shape(avg_rain));
    let extent = (heightmap.width, heightmap.height);
    let mut biomes = Tilemap::new_with(heightmap.width, heightmap.height, BandedBiome::Water);
    for (x, y, &elevation) in heightmap.iter() {
        let biome = classify_cell(elevation, *avg_rain.get(x, y), x, y, extent, params, rng);
        biomes.set(x, y, biome);
    }
    biomes
}
