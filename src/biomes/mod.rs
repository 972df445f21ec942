//! Biome classification from elevation and long-run climate
//!
//! Four interchangeable schemes share one output format: a `u8` biome id
//! per cell whose meaning depends on the [`BiomeScheme`] that produced it.

pub mod banded;
pub mod redblob;
pub mod tables;
pub mod whittaker;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::averaging::ClimateAverages;
use crate::params::BiomeParams;
use crate::seeds::ClimateSeeds;
use crate::tilemap::Tilemap;

pub use banded::{classify_banded, BandedBiome};
pub use redblob::{redblob_elevation_index, redblob_moisture_index, RedblobBiome};
pub use whittaker::{
    whittaker_precipitation_bin, whittaker_temperature_bin, WhittakerBiome, WhittakerExtendedBiome,
};

/// Common surface of every scheme's biome enum.
pub trait BiomeKind: Copy + Sized + 'static {
    /// Every biome of the scheme, in id order.
    const ALL: &'static [Self];

    fn id(self) -> u8;
    fn name(self) -> &'static str;
    /// Map color (RGB)
    fn color(self) -> (u8, u8, u8);

    fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.id() == id)
    }
}

/// Classification scheme selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum BiomeScheme {
    /// Elevation bands with rain cutoffs (ids 0-10)
    #[default]
    Banded,
    /// Whittaker temperature/precipitation table (ids 0-9)
    Whittaker,
    /// Whittaker table with cold desert, snow, swamps and savannah (ids 0-14)
    WhittakerExtended,
    /// Elevation zone by moisture zone (ids 0-13)
    Redblob,
}

impl BiomeScheme {
    pub const ALL: [BiomeScheme; 4] = [
        BiomeScheme::Banded,
        BiomeScheme::Whittaker,
        BiomeScheme::WhittakerExtended,
        BiomeScheme::Redblob,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BiomeScheme::Banded => "banded",
            BiomeScheme::Whittaker => "whittaker",
            BiomeScheme::WhittakerExtended => "whittaker_extended",
            BiomeScheme::Redblob => "redblob",
        }
    }

    /// Display name of an id under this scheme.
    pub fn biome_name(self, id: u8) -> Option<&'static str> {
        match self {
            BiomeScheme::Banded => BandedBiome::from_id(id).map(BiomeKind::name),
            BiomeScheme::Whittaker => WhittakerBiome::from_id(id).map(BiomeKind::name),
            BiomeScheme::WhittakerExtended => WhittakerExtendedBiome::from_id(id).map(BiomeKind::name),
            BiomeScheme::Redblob => RedblobBiome::from_id(id).map(BiomeKind::name),
        }
    }

    /// Map color of an id under this scheme; unknown ids render black.
    pub fn biome_color(self, id: u8) -> (u8, u8, u8) {
        let color = match self {
            BiomeScheme::Banded => BandedBiome::from_id(id).map(BiomeKind::color),
            BiomeScheme::Whittaker => WhittakerBiome::from_id(id).map(BiomeKind::color),
            BiomeScheme::WhittakerExtended => WhittakerExtendedBiome::from_id(id).map(BiomeKind::color),
            BiomeScheme::Redblob => RedblobBiome::from_id(id).map(BiomeKind::color),
        };
        color.unwrap_or((0, 0, 0))
    }

    /// Every `(id, name)` pair of the scheme.
    pub fn legend(self) -> Vec<(u8, &'static str)> {
        fn entries<B: BiomeKind>() -> Vec<(u8, &'static str)> {
            B::ALL.iter().map(|b| (b.id(), b.name())).collect()
        }
        match self {
            BiomeScheme::Banded => entries::<BandedBiome>(),
            BiomeScheme::Whittaker => entries::<WhittakerBiome>(),
            BiomeScheme::WhittakerExtended => entries::<WhittakerExtendedBiome>(),
            BiomeScheme::Redblob => entries::<RedblobBiome>(),
        }
    }
}

impl std::fmt::Display for BiomeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify every cell of a world.
///
/// Lookup schemes leave cells at or below the water band as id 0, which
/// every lookup scheme reserves for "no land biome".
pub fn classify_map(
    scheme: BiomeScheme,
    heightmap: &Tilemap<f32>,
    averages: &ClimateAverages,
    params: &BiomeParams,
    seeds: &ClimateSeeds,
) -> Tilemap<u8> {
    info!(%scheme, width = heightmap.width, height = heightmap.height, "classifying biomes");

    match scheme {
        BiomeScheme::Banded => {
            let mut rng = seeds.biome_rng();
            classify_banded(heightmap, &averages.avg_rain, params, &mut rng).map(|b| b.id())
        }
        BiomeScheme::Whittaker => classify_land(heightmap, params, |x, y| {
            let (celsius, decimeters) = lookup_inputs(averages, params, x, y);
            whittaker::lookup(celsius, decimeters).id()
        }),
        BiomeScheme::WhittakerExtended => classify_land(heightmap, params, |x, y| {
            let (celsius, decimeters) = lookup_inputs(averages, params, x, y);
            whittaker::lookup_extended(celsius, decimeters).id()
        }),
        BiomeScheme::Redblob => classify_land(heightmap, params, |x, y| {
            let zone = redblob::elevation_zone(*heightmap.get(x, y), params);
            let moisture = redblob::moisture_zone(*averages.avg_humidity.get(x, y));
            redblob::lookup(zone, moisture).id()
        }),
    }
}

fn classify_land<F>(heightmap: &Tilemap<f32>, params: &BiomeParams, land: F) -> Tilemap<u8>
where
    F: Fn(usize, usize) -> u8 + Sync + Send,
{
    let mut biomes = Tilemap::new_with(heightmap.width, heightmap.height, 0u8);
    biomes.par_fill_with(|x, y| {
        if *heightmap.get(x, y) <= params.water {
            0
        } else {
            land(x, y)
        }
    });
    biomes
}

/// Whole-degree temperature and whole-decimeter precipitation of a cell.
fn lookup_inputs(averages: &ClimateAverages, params: &BiomeParams, x: usize, y: usize) -> (i32, i32) {
    let celsius = params.to_celsius(*averages.avg_temp.get(x, y)).floor() as i32;
    let decimeters = params.to_decimeters(*averages.avg_rain.get(x, y)).floor() as i32;
    (celsius, decimeters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn averages_with(width: usize, height: usize, temp: f32, rain: f32, humidity: f32) -> ClimateAverages {
        let mut averages = ClimateAverages::new(width, height);
        averages.avg_temp.fill(temp);
        averages.avg_rain.fill(rain);
        averages.avg_humidity.fill(humidity);
        averages
    }

    #[test]
    fn test_ids_round_trip_through_legend() {
        for scheme in BiomeScheme::ALL {
            for (id, name) in scheme.legend() {
                assert_eq!(scheme.biome_name(id), Some(name));
            }
        }
        assert_eq!(BiomeScheme::Banded.legend().len(), 11);
        assert_eq!(BiomeScheme::Whittaker.legend().len(), 10);
        assert_eq!(BiomeScheme::WhittakerExtended.legend().len(), 15);
        assert_eq!(BiomeScheme::Redblob.legend().len(), 14);
    }

    #[test]
    fn test_unknown_id_renders_black() {
        assert_eq!(BiomeScheme::Whittaker.biome_color(200), (0, 0, 0));
        assert_eq!(BiomeScheme::Whittaker.biome_name(200), None);
    }

    #[test]
    fn test_lookup_schemes_skip_water() {
        let mut map = Tilemap::new_with(4, 4, 800.0f32);
        map.set(0, 0, 150.0);
        let averages = averages_with(4, 4, 0.9, 0.1, 0.5);
        let seeds = ClimateSeeds::from_master(1);
        let params = BiomeParams::default();

        for scheme in [BiomeScheme::Whittaker, BiomeScheme::WhittakerExtended, BiomeScheme::Redblob] {
            let biomes = classify_map(scheme, &map, &averages, &params, &seeds);
            assert_eq!(*biomes.get(0, 0), 0, "{scheme}");
            assert_ne!(*biomes.get(2, 2), 0, "{scheme}");
        }
    }

    #[test]
    fn test_whittaker_map_uses_converted_averages() {
        let map = Tilemap::new_with(3, 3, 800.0f32);
        // 0.9 -> 25.5 °C, 0.1 -> 4.5 dm
        let averages = averages_with(3, 3, 0.9, 0.1, 0.5);
        let biomes = classify_map(
            BiomeScheme::Whittaker,
            &map,
            &averages,
            &BiomeParams::default(),
            &ClimateSeeds::from_master(1),
        );
        let expected = whittaker::lookup(25, 4).id();
        assert!(biomes.as_slice().iter().all(|&b| b == expected));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let mut map = Tilemap::new_with(40, 30, 0.0f32);
        for (i, h) in (0..40 * 30).map(|i| (i, (i * 37 % 1600) as f32)) {
            map.set(i / 30, i % 30, h);
        }
        let averages = averages_with(40, 30, 0.5, 0.0005, 0.3);
        let seeds = ClimateSeeds::from_master(8);
        for scheme in BiomeScheme::ALL {
            let a = classify_map(scheme, &map, &averages, &BiomeParams::default(), &seeds);
            let b = classify_map(scheme, &map, &averages, &BiomeParams::default(), &seeds);
            assert_eq!(a, b, "{scheme}");
        }
    }
}
