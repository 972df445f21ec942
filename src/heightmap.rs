//! Heightmap inputs for the climate simulation
//!
//! The simulation consumes elevations in meters. These helpers turn
//! normalized `[0, 1]` terrain (from a grayscale PNG or generated noise)
//! into that scale.

use std::path::Path;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::error::Result;
use crate::tilemap::Tilemap;

/// Elevation (m) of a normalized value of 0
pub const MIN_ELEVATION: f32 = -300.0;
/// Elevation span (m) covered by normalized values 0..1
pub const ELEVATION_RANGE: f32 = 4000.0;

#[inline]
pub fn to_meters(normalized: f32) -> f32 {
    normalized * ELEVATION_RANGE + MIN_ELEVATION
}

#[inline]
pub fn to_normalized(meters: f32) -> f32 {
    (meters - MIN_ELEVATION) / ELEVATION_RANGE
}

/// Rescale a column-major buffer of normalized values into meters.
pub fn from_normalized(values: Vec<f32>, width: usize, height: usize) -> Result<Tilemap<f32>> {
    let normalized = Tilemap::from_vec(width, height, values)?;
    Ok(normalized.map(|&v| to_meters(v)))
}

/// Load a grayscale PNG as elevations in meters.
pub fn load_png(path: impl AsRef<Path>) -> Result<Tilemap<f32>> {
    let img = image::open(path)?.into_luma16();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let mut map = Tilemap::new_with(width, height, 0.0f32);
    for (x, y, pixel) in img.enumerate_pixels() {
        let normalized = f32::from(pixel.0[0]) / f32::from(u16::MAX);
        map.set(x as usize, y as usize, to_meters(normalized));
    }
    Ok(map)
}

/// Fractal test terrain in meters: an island that drops to the sea floor at the edges.
pub fn synthetic(width: usize, height: usize, seed: u64) -> Tilemap<f32> {
    let terrain: Fbm<Perlin> = Fbm::new(seed as u32)
        .set_octaves(5)
        .set_frequency(3.0)
        .set_lacunarity(2.0)
        .set_persistence(0.5);
    let detail: Fbm<Perlin> = Fbm::new((seed as u32).wrapping_add(3333))
        .set_octaves(3)
        .set_frequency(12.0)
        .set_lacunarity(2.0)
        .set_persistence(0.6);

    let mut map = Tilemap::new_with(width, height, 0.0f32);
    map.par_fill_with(|x, y| {
        let nx = x as f64 / width.max(1) as f64;
        let ny = y as f64 / height.max(1) as f64;

        let base = (terrain.get([nx, ny]) + 1.0) * 0.5;
        let rough = detail.get([nx, ny]) * 0.08;

        // Radial mask so the border is ocean
        let dx = nx - 0.5;
        let dy = ny - 0.5;
        let mask = (1.0 - (dx * dx + dy * dy).sqrt() * 2.0).clamp(0.0, 1.0);

        let normalized = ((base * 0.7 + rough) * mask).clamp(0.0, 1.0);
        to_meters(normalized as f32)
    });
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{ImageBuffer, Luma};

    #[test]
    fn test_scaling() {
        assert_relative_eq!(to_meters(0.0), -300.0);
        assert_relative_eq!(to_meters(1.0), 3700.0);
        assert_relative_eq!(to_meters(0.125), 200.0);
        assert_relative_eq!(to_normalized(to_meters(0.42)), 0.42, epsilon = 1e-6);
    }

    #[test]
    fn test_from_normalized_checks_length() {
        assert!(from_normalized(vec![0.5; 5], 2, 3).is_err());
        let map = from_normalized(vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.5], 2, 3).unwrap();
        assert_relative_eq!(*map.get(0, 1), 700.0);
        assert_relative_eq!(*map.get(1, 1), 3700.0);
    }

    #[test]
    fn test_synthetic_is_deterministic_and_in_range() {
        let a = synthetic(40, 30, 5);
        let b = synthetic(40, 30, 5);
        assert_eq!(a, b);
        let (lo, hi) = a.min_max().unwrap();
        assert!(lo >= MIN_ELEVATION && hi <= MIN_ELEVATION + ELEVATION_RANGE);
        // Corners fall to sea
        assert!(*a.get(0, 0) < 200.0);
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.png");
        let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(3, 2);
        img.put_pixel(2, 1, Luma([u16::MAX]));
        img.save(&path).unwrap();

        let map = load_png(&path).unwrap();
        assert_eq!((map.width, map.height), (3, 2));
        assert_relative_eq!(*map.get(0, 0), -300.0);
        assert_relative_eq!(*map.get(2, 1), 3700.0);
    }

    #[test]
    fn test_missing_png_is_error() {
        assert!(load_png("/nonexistent/terrain.png").is_err());
    }
}
