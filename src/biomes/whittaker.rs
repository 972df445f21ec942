//! Whittaker temperature/precipitation lookup
//!
//! Inputs are whole degrees Celsius and whole decimeters of yearly
//! precipitation. Both are clamped into the table instead of rejected.

use super::tables::{WHITTAKER, WHITTAKER_BINS, WHITTAKER_EXTENDED};
use super::BiomeKind;

pub const MIN_TEMPERATURE_C: i32 = -15;
pub const MAX_TEMPERATURE_C: i32 = 30;
pub const MIN_PRECIPITATION_DM: i32 = 0;
pub const MAX_PRECIPITATION_DM: i32 = 45;

const LAST_BIN: usize = WHITTAKER_BINS - 1;

/// Temperature bin, 0 for the coldest and 44 for the hottest.
pub fn whittaker_temperature_bin(celsius: i32) -> usize {
    if celsius <= MIN_TEMPERATURE_C {
        return 0;
    }
    if celsius >= MAX_TEMPERATURE_C {
        return LAST_BIN;
    }
    ((celsius - MIN_TEMPERATURE_C) as usize).min(LAST_BIN)
}

/// Precipitation bin, which is the table row.
pub fn whittaker_precipitation_bin(decimeters: i32) -> usize {
    if decimeters >= MAX_PRECIPITATION_DM {
        return LAST_BIN;
    }
    if decimeters <= MIN_PRECIPITATION_DM {
        return 0;
    }
    decimeters as usize
}

/// Table cell for a temperature and precipitation.
fn cell(table: &[[u8; WHITTAKER_BINS]; WHITTAKER_BINS], celsius: i32, decimeters: i32) -> u8 {
    // Columns run from hot to cold
    let column = LAST_BIN - whittaker_temperature_bin(celsius);
    table[whittaker_precipitation_bin(decimeters)][column]
}

pub fn lookup(celsius: i32, decimeters: i32) -> WhittakerBiome {
    WhittakerBiome::from_id(cell(&WHITTAKER, celsius, decimeters)).unwrap_or(WhittakerBiome::Unknown)
}

pub fn lookup_extended(celsius: i32, decimeters: i32) -> WhittakerExtendedBiome {
    WhittakerExtendedBiome::from_id(cell(&WHITTAKER_EXTENDED, celsius, decimeters))
        .unwrap_or(WhittakerExtendedBiome::Unknown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum WhittakerBiome {
    Unknown = 0,
    TropicalRainForest = 1,
    TropicalSeasonalForestSavanna = 2,
    SubtropicalDesert = 3,
    TemperateRainForest = 4,
    TemperateSeasonalForest = 5,
    WoodlandShrubland = 6,
    TemperateGrasslandDesert = 7,
    BorealForestTaiga = 8,
    Tundra = 9,
}

impl BiomeKind for WhittakerBiome {
    const ALL: &'static [Self] = &[
        WhittakerBiome::Unknown,
        WhittakerBiome::TropicalRainForest,
        WhittakerBiome::TropicalSeasonalForestSavanna,
        WhittakerBiome::SubtropicalDesert,
        WhittakerBiome::TemperateRainForest,
        WhittakerBiome::TemperateSeasonalForest,
        WhittakerBiome::WoodlandShrubland,
        WhittakerBiome::TemperateGrasslandDesert,
        WhittakerBiome::BorealForestTaiga,
        WhittakerBiome::Tundra,
    ];

    fn id(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            WhittakerBiome::Unknown => "Unknown",
            WhittakerBiome::TropicalRainForest => "Tropical Rain Forest",
            WhittakerBiome::TropicalSeasonalForestSavanna => "Tropical Seasonal Forest / Savanna",
            WhittakerBiome::SubtropicalDesert => "Subtropical Desert",
            WhittakerBiome::TemperateRainForest => "Temperate Rain Forest",
            WhittakerBiome::TemperateSeasonalForest => "Temperate Seasonal Forest",
            WhittakerBiome::WoodlandShrubland => "Woodland / Shrubland",
            WhittakerBiome::TemperateGrasslandDesert => "Temperate Grassland / Desert",
            WhittakerBiome::BorealForestTaiga => "Boreal Forest / Taiga",
            WhittakerBiome::Tundra => "Tundra",
        }
    }

    fn color(self) -> (u8, u8, u8) {
        match self {
            WhittakerBiome::Unknown => (0, 0, 0),
            WhittakerBiome::TropicalRainForest => (0x9C, 0xBB, 0xA9),
            WhittakerBiome::TropicalSeasonalForestSavanna => (0xA9, 0xCC, 0xA4),
            WhittakerBiome::SubtropicalDesert => (0xE9, 0xDD, 0xC7),
            WhittakerBiome::TemperateRainForest => (0xA4, 0xC4, 0xA8),
            WhittakerBiome::TemperateSeasonalForest => (0xB4, 0xC9, 0xA9),
            WhittakerBiome::WoodlandShrubland => (0xC4, 0xCC, 0xBB),
            WhittakerBiome::TemperateGrasslandDesert => (0xE4, 0xE8, 0xCA),
            WhittakerBiome::BorealForestTaiga => (0xCC, 0xD4, 0xBB),
            WhittakerBiome::Tundra => (0xDD, 0xDD, 0xBB),
        }
    }
}

/// Extended table: splits cold deserts, snow, swamps and savannah out of
/// the base biomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum WhittakerExtendedBiome {
    Unknown = 0,
    TropicalRainForest = 1,
    TropicalSeasonalForest = 2,
    SubtropicalDesert = 3,
    TemperateRainForest = 4,
    TemperateSeasonalForest = 5,
    WoodlandShrubland = 6,
    TemperateGrassland = 7,
    BorealForestTaiga = 8,
    Tundra = 9,
    ColdDesert = 10,
    Snow = 11,
    HotSwamp = 12,
    Wetlands = 13,
    Savannah = 14,
}

impl BiomeKind for WhittakerExtendedBiome {
    const ALL: &'static [Self] = &[
        WhittakerExtendedBiome::Unknown,
        WhittakerExtendedBiome::TropicalRainForest,
        WhittakerExtendedBiome::TropicalSeasonalForest,
        WhittakerExtendedBiome::SubtropicalDesert,
        WhittakerExtendedBiome::TemperateRainForest,
        WhittakerExtendedBiome::TemperateSeasonalForest,
        WhittakerExtendedBiome::WoodlandShrubland,
        WhittakerExtendedBiome::TemperateGrassland,
        WhittakerExtendedBiome::BorealForestTaiga,
        WhittakerExtendedBiome::Tundra,
        WhittakerExtendedBiome::ColdDesert,
        WhittakerExtendedBiome::Snow,
        WhittakerExtendedBiome::HotSwamp,
        WhittakerExtendedBiome::Wetlands,
        WhittakerExtendedBiome::Savannah,
    ];

    fn id(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            WhittakerExtendedBiome::Unknown => "Unknown",
            WhittakerExtendedBiome::TropicalRainForest => "Tropical Rain Forest",
            WhittakerExtendedBiome::TropicalSeasonalForest => "Tropical Seasonal Forest",
            WhittakerExtendedBiome::SubtropicalDesert => "Subtropical Desert",
            WhittakerExtendedBiome::TemperateRainForest => "Temperate Rain Forest",
            WhittakerExtendedBiome::TemperateSeasonalForest => "Temperate Seasonal Forest",
            WhittakerExtendedBiome::WoodlandShrubland => "Woodland / Shrubland",
            WhittakerExtendedBiome::TemperateGrassland => "Temperate Grassland",
            WhittakerExtendedBiome::BorealForestTaiga => "Boreal Forest / Taiga",
            WhittakerExtendedBiome::Tundra => "Tundra",
            WhittakerExtendedBiome::ColdDesert => "Cold Desert",
            WhittakerExtendedBiome::Snow => "Snow",
            WhittakerExtendedBiome::HotSwamp => "Hot Swamp",
            WhittakerExtendedBiome::Wetlands => "Wetlands",
            WhittakerExtendedBiome::Savannah => "Savannah",
        }
    }

    fn color(self) -> (u8, u8, u8) {
        match self {
            WhittakerExtendedBiome::Unknown => (0, 0, 0),
            WhittakerExtendedBiome::TropicalRainForest => (0x9C, 0xBB, 0xA9),
            WhittakerExtendedBiome::TropicalSeasonalForest => (0xA9, 0xCC, 0xA4),
            WhittakerExtendedBiome::SubtropicalDesert => (0xFD, 0xE3, 0x8D),
            WhittakerExtendedBiome::TemperateRainForest => (0xA4, 0xC4, 0xA8),
            WhittakerExtendedBiome::TemperateSeasonalForest => (0xB4, 0xC9, 0xA9),
            WhittakerExtendedBiome::WoodlandShrubland => (0xC4, 0xCC, 0xBB),
            WhittakerExtendedBiome::TemperateGrassland => (0xE4, 0xE8, 0xCA),
            WhittakerExtendedBiome::BorealForestTaiga => (0xCC, 0xD4, 0xBB),
            WhittakerExtendedBiome::Tundra => (0xDD, 0xDD, 0xBB),
            WhittakerExtendedBiome::ColdDesert => (0xCC, 0xCC, 0xCC),
            WhittakerExtendedBiome::Snow => (0xFF, 0xFF, 0xFF),
            WhittakerExtendedBiome::HotSwamp => (0x96, 0x4B, 0x00),
            WhittakerExtendedBiome::Wetlands => (0x6E, 0x8B, 0x74),
            WhittakerExtendedBiome::Savannah => (0xFF, 0xD1, 0x45),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_bins_clamp() {
        assert_eq!(whittaker_temperature_bin(-40), 0);
        assert_eq!(whittaker_temperature_bin(-15), 0);
        assert_eq!(whittaker_temperature_bin(-14), 1);
        assert_eq!(whittaker_temperature_bin(0), 15);
        assert_eq!(whittaker_temperature_bin(29), 44);
        assert_eq!(whittaker_temperature_bin(30), 44);
        assert_eq!(whittaker_temperature_bin(55), 44);
    }

    #[test]
    fn test_precipitation_bins_clamp() {
        assert_eq!(whittaker_precipitation_bin(-3), 0);
        assert_eq!(whittaker_precipitation_bin(0), 0);
        assert_eq!(whittaker_precipitation_bin(17), 17);
        assert_eq!(whittaker_precipitation_bin(44), 44);
        assert_eq!(whittaker_precipitation_bin(45), 44);
        assert_eq!(whittaker_precipitation_bin(300), 44);
    }

    #[test]
    fn test_out_of_range_matches_clamped_extremes() {
        assert_eq!(lookup(-60, 500), lookup(MIN_TEMPERATURE_C, MAX_PRECIPITATION_DM));
        assert_eq!(lookup(90, -10), lookup(MAX_TEMPERATURE_C, MIN_PRECIPITATION_DM));
        assert_eq!(
            lookup_extended(-60, 500),
            lookup_extended(MIN_TEMPERATURE_C, MAX_PRECIPITATION_DM)
        );
    }

    #[test]
    fn test_table_orientation() {
        // Hot and dry
        assert_eq!(lookup(30, 0), WhittakerBiome::SubtropicalDesert);
        // Cold and dry
        assert_eq!(lookup(-15, 0), WhittakerBiome::Tundra);
        // Hot and very wet
        assert_eq!(lookup(25, 40), WhittakerBiome::TropicalRainForest);
        // Mild and moderately wet
        assert_eq!(lookup(10, 15), WhittakerBiome::TemperateSeasonalForest);
    }

    #[test]
    fn test_extended_variants() {
        assert_eq!(lookup_extended(5, 0), WhittakerExtendedBiome::ColdDesert);
        assert_eq!(lookup_extended(-15, 20), WhittakerExtendedBiome::Snow);
        assert_eq!(lookup_extended(30, 44), WhittakerExtendedBiome::HotSwamp);
    }

    #[test]
    fn test_every_table_id_is_named() {
        for row in WHITTAKER.iter() {
            for &id in row {
                assert!(WhittakerBiome::from_id(id).is_some());
            }
        }
        for row in WHITTAKER_EXTENDED.iter() {
            for &id in row {
                assert!(WhittakerExtendedBiome::from_id(id).is_some());
            }
        }
    }
}
