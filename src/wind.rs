//! Wind model: one global direction per day plus a terrain-driven speed field
//!
//! The direction is sampled from smooth noise over the fraction of the year,
//! so it drifts over the seasons but can still turn sharply between two days.
//! Local speed depends only on the slope toward the upwind terrain sample.

use noise::{NoiseFn, OpenSimplex};
use serde::{Deserialize, Serialize};

use crate::params::WindParams;
use crate::tilemap::Tilemap;

/// Noise inputs are offset by the folded seed modulo this period; larger
/// offsets would swallow the sub-unit time coordinate in f64 precision.
const NOISE_OFFSET_PERIOD: u64 = 1 << 16;

/// Fold the high half of a seed into the low half so every bit reaches the
/// 32-bit noise seed.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Global wind vector, each component roughly in `[-1, 1]`.
///
/// Fields are advected by reading from the cell this vector points at, so it
/// points toward where the air comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub x: f32,
    pub y: f32,
}

impl WindVector {
    pub const CALM: WindVector = WindVector { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Grid step covering `distance` cells along the vector, truncated toward zero.
    pub fn truncated_offset(&self, distance: f32) -> (i64, i64) {
        ((distance * self.x) as i64, (distance * self.y) as i64)
    }

    /// Grid step covering `distance` cells along the vector, rounded to nearest.
    pub fn rounded_offset(&self, distance: f32) -> (i64, i64) {
        ((distance * self.x).round() as i64, (distance * self.y).round() as i64)
    }
}

/// Seeded source of the daily wind direction.
///
/// Each simulation instance owns its own model; nothing is shared between
/// instances, so parallel runs never contend on generator state.
#[derive(Clone)]
pub struct WindModel {
    noise: OpenSimplex,
    offset: f64,
    year_length: f64,
}

impl WindModel {
    pub fn new(seed: u64, year_length_days: u32) -> Self {
        let folded = fold_seed(seed);
        Self {
            noise: OpenSimplex::new(folded),
            offset: (u64::from(folded) % NOISE_OFFSET_PERIOD) as f64,
            year_length: f64::from(year_length_days.max(1)),
        }
    }

    /// Wind direction on the given day.
    pub fn direction(&self, day: u32) -> WindVector {
        let t = f64::from(day) / self.year_length;
        WindVector {
            x: self.noise.get([t, self.offset]) as f32,
            y: self.noise.get([t, t + self.offset]) as f32,
        }
    }
}

/// Per-cell wind speed for a global direction.
///
/// Air flowing down from higher ground speeds up, air pushed uphill slows.
/// The upwind sample sits `upwind_distance` cells along the direction and
/// falls back to the cell itself on any axis that leaves the map. Speeds are
/// not clamped; negative values are valid inputs to the later stages.
pub fn compute_wind_speed(
    heightmap: &Tilemap<f32>,
    direction: WindVector,
    params: &WindParams,
    speed: &mut Tilemap<f32>,
) {
    debug_assert!(heightmap.same_shape(speed));
    let (dx, dy) = direction.truncated_offset(params.upwind_distance);
    speed.par_fill_with(|x, y| {
        let (ux, uy) = heightmap.upwind(x, y, dx, dy);
        let drop = *heightmap.get(x, y) - *heightmap.get(ux, uy);
        params.base_speed * (1.0 - drop / params.slope_scale)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Tilemap<f32> {
        // Elevation rises 100 m per column
        let mut map = Tilemap::new_with(width, height, 0.0f32);
        for x in 0..width {
            for y in 0..height {
                map.set(x, y, 100.0 * x as f32);
            }
        }
        map
    }

    #[test]
    fn test_direction_is_deterministic() {
        let a = WindModel::new(42, 365);
        let b = WindModel::new(42, 365);
        for day in [0, 1, 100, 364] {
            assert_eq!(a.direction(day), b.direction(day));
        }
    }

    #[test]
    fn test_direction_components_bounded() {
        let model = WindModel::new(7, 365);
        for day in 0..365 {
            let dir = model.direction(day);
            assert!(dir.x.abs() <= 1.5 && dir.y.abs() <= 1.5, "day {day}: {dir:?}");
        }
    }

    #[test]
    fn test_direction_depends_on_seed() {
        let a = WindModel::new(1, 365);
        let b = WindModel::new(2, 365);
        let differs = (0..365).any(|d| a.direction(d) != b.direction(d));
        assert!(differs);
    }

    #[test]
    fn test_high_seed_bits_change_direction() {
        let low = WindModel::new(1, 365);
        let high = WindModel::new((1 << 32) + 1, 365);
        let differs = (0..365).any(|d| low.direction(d) != high.direction(d));
        assert!(differs);
        assert_ne!(fold_seed(1), fold_seed((1 << 32) + 1));
        assert_eq!(fold_seed(12345), 12345);
    }

    #[test]
    fn test_flat_terrain_gives_base_speed() {
        let heightmap = Tilemap::new_with(8, 8, 350.0f32);
        let mut speed = Tilemap::new(8, 8);
        compute_wind_speed(&heightmap, WindVector::new(0.5, -0.3), &WindParams::default(), &mut speed);
        assert!(speed.as_slice().iter().all(|&s| (s - 5.0).abs() < 1e-6));
    }

    #[test]
    fn test_downhill_flow_is_faster() {
        let heightmap = ramp(30, 5);
        let mut speed = Tilemap::new(30, 5);
        // Sample 10 cells toward +x, which is 1000 m higher: air flows downhill
        compute_wind_speed(&heightmap, WindVector::new(1.0, 0.0), &WindParams::default(), &mut speed);
        assert!((*speed.get(5, 2) - 10.0).abs() < 1e-4);

        // Reversed direction pushes the air uphill
        compute_wind_speed(&heightmap, WindVector::new(-1.0, 0.0), &WindParams::default(), &mut speed);
        assert!(speed.get(15, 2).abs() < 1e-4);
    }

    #[test]
    fn test_upwind_outside_map_uses_own_cell() {
        let heightmap = ramp(12, 4);
        let mut speed = Tilemap::new(12, 4);
        compute_wind_speed(&heightmap, WindVector::new(1.0, 0.0), &WindParams::default(), &mut speed);
        // x + 10 leaves the grid, so the slope term vanishes
        assert!((*speed.get(5, 1) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_offsets() {
        let v = WindVector::new(0.56, -0.56);
        assert_eq!(v.truncated_offset(10.0), (5, -5));
        assert_eq!(v.rounded_offset(10.0), (6, -6));
        assert_eq!(WindVector::CALM.rounded_offset(10.0), (0, 0));
    }
}
