//! Elevation zone by moisture zone lookup
//!
//! Zones are 1-based: elevation zones 1 (low) to 4 (high), moisture zones
//! 1 (dry) to 6 (wet). Anything outside is clamped to the nearest zone.

use super::tables::REDBLOB;
use super::BiomeKind;
use crate::params::BiomeParams;

/// Table row for an elevation zone.
pub fn redblob_elevation_index(zone: i32) -> usize {
    if (1..=4).contains(&zone) {
        return (zone - 1) as usize;
    }
    if zone < 1 {
        0
    } else {
        3
    }
}

/// Table column for a moisture zone.
pub fn redblob_moisture_index(zone: i32) -> usize {
    if (1..=6).contains(&zone) {
        return (zone - 1) as usize;
    }
    if zone < 1 {
        0
    } else {
        5
    }
}

/// Elevation zone of a land cell, spreading sea level to the peak over four zones.
pub fn elevation_zone(elevation: f32, params: &BiomeParams) -> i32 {
    let span = params.redblob_peak - params.water;
    1 + (4.0 * (elevation - params.water) / span).floor() as i32
}

/// Moisture zone of an average humidity in `[0, 1]`.
pub fn moisture_zone(avg_humidity: f32) -> i32 {
    1 + (6.0 * avg_humidity).floor() as i32
}

pub fn lookup(elevation_zone: i32, moisture_zone: i32) -> RedblobBiome {
    let id = REDBLOB[redblob_elevation_index(elevation_zone)][redblob_moisture_index(moisture_zone)];
    RedblobBiome::from_id(id).unwrap_or(RedblobBiome::Unknown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum RedblobBiome {
    Unknown = 0,
    Tundra = 1,
    Taiga = 2,
    Shrubland = 3,
    TemperateRainForest = 4,
    TropicalRainForest = 5,
    TropicalSeasonalForest = 6,
    SubtropicalDesert = 7,
    TemperateSeasonalForest = 8,
    TemperateDesert = 9,
    Grassland = 10,
    Snow = 11,
    Bare = 12,
    Scorched = 13,
}

impl BiomeKind for RedblobBiome {
    const ALL: &'static [Self] = &[
        RedblobBiome::Unknown,
        RedblobBiome::Tundra,
        RedblobBiome::Taiga,
        RedblobBiome::Shrubland,
        RedblobBiome::TemperateRainForest,
        RedblobBiome::TropicalRainForest,
        RedblobBiome::TropicalSeasonalForest,
        RedblobBiome::SubtropicalDesert,
        RedblobBiome::TemperateSeasonalForest,
        RedblobBiome::TemperateDesert,
        RedblobBiome::Grassland,
        RedblobBiome::Snow,
        RedblobBiome::Bare,
        RedblobBiome::Scorched,
    ];

    fn id(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            RedblobBiome::Unknown => "Unknown",
            RedblobBiome::Tundra => "Tundra",
            RedblobBiome::Taiga => "Taiga",
            RedblobBiome::Shrubland => "Shrubland",
            RedblobBiome::TemperateRainForest => "Temperate Rain Forest",
            RedblobBiome::TropicalRainForest => "Tropical Rain Forest",
            RedblobBiome::TropicalSeasonalForest => "Tropical Seasonal Forest",
            RedblobBiome::SubtropicalDesert => "Subtropical Desert",
            RedblobBiome::TemperateSeasonalForest => "Temperate Seasonal Forest",
            RedblobBiome::TemperateDesert => "Temperate Desert",
            RedblobBiome::Grassland => "Grassland",
            RedblobBiome::Snow => "Snow",
            RedblobBiome::Bare => "Bare",
            RedblobBiome::Scorched => "Scorched",
        }
    }

    fn color(self) -> (u8, u8, u8) {
        match self {
            RedblobBiome::Unknown => (0, 0, 0),
            RedblobBiome::Tundra => (0xDD, 0xDD, 0xBB),
            RedblobBiome::Taiga => (0xCC, 0xD4, 0xBB),
            RedblobBiome::Shrubland => (0xC4, 0xCC, 0xBB),
            RedblobBiome::TemperateRainForest => (0xA4, 0xC4, 0xA8),
            RedblobBiome::TropicalRainForest => (0x9C, 0xBB, 0xA9),
            RedblobBiome::TropicalSeasonalForest => (0xA9, 0xCC, 0xA4),
            RedblobBiome::SubtropicalDesert => (0xE9, 0xDD, 0xC7),
            RedblobBiome::TemperateSeasonalForest => (0xB4, 0xC9, 0xA9),
            RedblobBiome::TemperateDesert => (0xE4, 0xE8, 0xCA),
            RedblobBiome::Grassland => (0xC4, 0xD4, 0xAA),
            RedblobBiome::Snow => (0xFF, 0xFF, 0xFF),
            RedblobBiome::Bare => (0xBB, 0xBB, 0xBB),
            RedblobBiome::Scorched => (0x99, 0x99, 0x99),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_clamping() {
        assert_eq!(redblob_elevation_index(-2), 0);
        assert_eq!(redblob_elevation_index(1), 0);
        assert_eq!(redblob_elevation_index(4), 3);
        assert_eq!(redblob_elevation_index(9), 3);
        assert_eq!(redblob_moisture_index(0), 0);
        assert_eq!(redblob_moisture_index(3), 2);
        assert_eq!(redblob_moisture_index(7), 5);
    }

    #[test]
    fn test_out_of_range_matches_clamped_extremes() {
        assert_eq!(lookup(-5, 20), lookup(1, 6));
        assert_eq!(lookup(12, -1), lookup(4, 1));
    }

    #[test]
    fn test_corners() {
        assert_eq!(lookup(1, 1), RedblobBiome::SubtropicalDesert);
        assert_eq!(lookup(1, 6), RedblobBiome::TropicalRainForest);
        assert_eq!(lookup(4, 1), RedblobBiome::Scorched);
        assert_eq!(lookup(4, 6), RedblobBiome::Snow);
    }

    #[test]
    fn test_zones() {
        let params = BiomeParams::default();
        assert_eq!(elevation_zone(210.0, &params), 1);
        assert_eq!(elevation_zone(2000.0, &params), 3);
        assert_eq!(elevation_zone(3700.0, &params), 5);
        assert_eq!(moisture_zone(0.0), 1);
        assert_eq!(moisture_zone(0.5), 4);
        assert_eq!(moisture_zone(1.0), 7);
    }
}
