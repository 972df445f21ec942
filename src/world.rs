//! Whole-world climate generation
//!
//! Runs the averaging simulation over a heightmap, then classifies every
//! cell into a biome from the resulting norms.

use tracing::info;

use crate::averaging::{compute_averages, ClimateAverages};
use crate::biomes::{classify_map, BiomeScheme};
use crate::display::DisplayRun;
use crate::error::Result;
use crate::params::ClimateParams;
use crate::seeds::ClimateSeeds;
use crate::tilemap::Tilemap;

/// Climate norms and biomes of a world.
#[derive(Clone, Debug)]
pub struct WorldClimate {
    pub width: usize,
    pub height: usize,
    pub seeds: ClimateSeeds,
    pub averages: ClimateAverages,
    pub biomes: Tilemap<u8>,
    pub scheme: BiomeScheme,
}

impl WorldClimate {
    /// Display name of the biome at a cell.
    pub fn biome_name(&self, x: usize, y: usize) -> &'static str {
        self.scheme.biome_name(*self.biomes.get(x, y)).unwrap_or("Unknown")
    }

    /// Cell count per biome id, sorted by id.
    pub fn biome_histogram(&self) -> Vec<(u8, usize)> {
        let mut counts = [0usize; 256];
        for &id in self.biomes.as_slice() {
            counts[id as usize] += 1;
        }
        counts
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(id, &n)| (id as u8, n))
            .collect()
    }
}

/// Average the climate over the configured years and classify biomes.
pub fn generate_climate(
    heightmap: &Tilemap<f32>,
    seeds: &ClimateSeeds,
    params: &ClimateParams,
    scheme: BiomeScheme,
) -> Result<WorldClimate> {
    info!(%seeds, years = params.simulation.years, %scheme, "generating climate");

    let averages = compute_averages(heightmap, seeds.wind, params)?;
    let biomes = classify_map(scheme, heightmap, &averages, &params.biomes, seeds);

    Ok(WorldClimate {
        width: heightmap.width,
        height: heightmap.height,
        seeds: seeds.clone(),
        averages,
        biomes,
        scheme,
    })
}

/// Replay that retraces the averaging run of [`generate_climate`].
pub fn display_run<'a>(
    heightmap: &'a Tilemap<f32>,
    seeds: &ClimateSeeds,
    params: &ClimateParams,
) -> Result<DisplayRun<'a>> {
    DisplayRun::new(heightmap, seeds.wind, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClimateError;
    use crate::heightmap::synthetic;

    fn quick_params() -> ClimateParams {
        let mut params = ClimateParams::default();
        params.simulation.year_length_days = 30;
        params
    }

    #[test]
    fn test_generate_is_deterministic() {
        let heightmap = synthetic(24, 20, 7);
        let seeds = ClimateSeeds::from_master(7);
        let a = generate_climate(&heightmap, &seeds, &quick_params(), BiomeScheme::Banded).unwrap();
        let b = generate_climate(&heightmap, &seeds, &quick_params(), BiomeScheme::Banded).unwrap();
        assert_eq!(a.averages, b.averages);
        assert_eq!(a.biomes, b.biomes);
        assert_eq!((a.width, a.height), (24, 20));
    }

    #[test]
    fn test_histogram_covers_every_cell() {
        let heightmap = synthetic(16, 16, 2);
        let world = generate_climate(
            &heightmap,
            &ClimateSeeds::from_master(2),
            &quick_params(),
            BiomeScheme::WhittakerExtended,
        )
        .unwrap();
        let total: usize = world.biome_histogram().iter().map(|&(_, n)| n).sum();
        assert_eq!(total, 256);
        // Corners are sea floor
        assert_eq!(world.biome_name(0, 0), "Unknown");
    }

    #[test]
    fn test_banded_sea_is_water() {
        let heightmap = synthetic(16, 16, 4);
        let world =
            generate_climate(&heightmap, &ClimateSeeds::from_master(4), &quick_params(), BiomeScheme::Banded)
                .unwrap();
        assert_eq!(world.biome_name(0, 0), "Water");
    }

    #[test]
    fn test_tiny_heightmap_is_configuration_error() {
        let heightmap = Tilemap::new_with(2, 8, 0.0f32);
        let err = generate_climate(&heightmap, &ClimateSeeds::from_master(1), &quick_params(), BiomeScheme::Banded)
            .unwrap_err();
        assert!(matches!(err, ClimateError::GridTooSmall { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_display_run_uses_wind_seed() {
        let heightmap = synthetic(12, 12, 9);
        let seeds = ClimateSeeds::from_master(9);
        let mut replay = display_run(&heightmap, &seeds, &quick_params()).unwrap();
        let mut direct = DisplayRun::new(&heightmap, 9, &quick_params()).unwrap();
        assert_eq!(replay.advance(), direct.advance());
    }
}
