//! PNG export of climate fields, biome maps and per-day frames
//!
//! Everything here reads finished snapshots; nothing feeds back into the
//! simulation.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::biomes::BiomeScheme;
use crate::display::DaySnapshot;
use crate::error::Result;
use crate::heightmap::to_normalized;
use crate::tilemap::Tilemap;

/// Frame value of a cloudy cell.
pub const FRAME_CLOUD: f32 = 0.2;
/// Frame value of a raining cell.
pub const FRAME_RAIN: f32 = 0.7;

/// Export a scalar field with the spectral colormap.
///
/// Values are stretched over `range`, or over the field's own extent when
/// no range is given. A constant field renders at the low end.
pub fn export_scalar_field(field: &Tilemap<f32>, range: Option<(f32, f32)>, path: impl AsRef<Path>) -> Result<()> {
    let (lo, hi) = range.or_else(|| field.min_max()).unwrap_or((0.0, 1.0));
    let span = if hi > lo { hi - lo } else { 1.0 };

    let img = render(field.width, field.height, |x, y| {
        spectral_colormap(((*field.get(x, y) - lo) / span).clamp(0.0, 1.0))
    });
    img.save(path)?;
    Ok(())
}

/// Export a biome id map in the scheme's colors.
pub fn export_biome_map(biomes: &Tilemap<u8>, scheme: BiomeScheme, path: impl AsRef<Path>) -> Result<()> {
    let img = render(biomes.width, biomes.height, |x, y| {
        let (r, g, b) = scheme.biome_color(*biomes.get(x, y));
        [r, g, b]
    });
    img.save(path)?;
    Ok(())
}

/// Frame values of one day: terrain height, overwritten by cloud and then rain.
pub fn day_frame_values(heightmap: &Tilemap<f32>, snapshot: &DaySnapshot) -> Tilemap<f32> {
    let mut values = heightmap.map(|&h| to_normalized(h).clamp(0.0, 1.0));
    for (x, y, &cloudy) in snapshot.cloud.iter() {
        if cloudy {
            values.set(x, y, FRAME_CLOUD);
        }
    }
    for (x, y, &raining) in snapshot.rain.iter() {
        if raining {
            values.set(x, y, FRAME_RAIN);
        }
    }
    values
}

/// Export one replayed day as a frame.
pub fn export_day_frame(heightmap: &Tilemap<f32>, snapshot: &DaySnapshot, path: impl AsRef<Path>) -> Result<()> {
    export_scalar_field(&day_frame_values(heightmap, snapshot), Some((0.0, 1.0)), path)
}

fn render<F: Fn(usize, usize) -> [u8; 3]>(width: usize, height: usize, color: F) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            img.put_pixel(x as u32, y as u32, Rgb(color(x, y)));
        }
    }
    img
}

/// Stops of the diverging spectral palette, low to high.
const SPECTRAL: [[u8; 3]; 11] = [
    [94, 79, 163],
    [51, 135, 189],
    [102, 194, 166],
    [171, 222, 163],
    [230, 245, 153],
    [255, 255, 191],
    [255, 224, 140],
    [252, 173, 97],
    [245, 110, 66],
    [214, 61, 79],
    [158, 0, 66],
];

/// Color of `t` in `[0, 1]`, interpolated between neighbouring stops.
fn spectral_colormap(t: f32) -> [u8; 3] {
    let segments = (SPECTRAL.len() - 1) as f32;
    let pos = t.clamp(0.0, 1.0) * segments;
    let lower = (pos.floor() as usize).min(SPECTRAL.len() - 2);
    let frac = pos - lower as f32;

    let (from, to) = (SPECTRAL[lower], SPECTRAL[lower + 1]);
    std::array::from_fn(|c| {
        let (a, b) = (f32::from(from[c]), f32::from(to[c]));
        (a + (b - a) * frac).round() as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ClimateParams;
    use crate::wind::WindVector;

    fn snapshot(width: usize, height: usize) -> DaySnapshot {
        DaySnapshot {
            day: 0,
            wind_direction: WindVector::CALM,
            temperature: Tilemap::new_with(width, height, 0.5),
            humidity: Tilemap::new_with(width, height, 0.5),
            cloud: Tilemap::new_with(width, height, false),
            rain: Tilemap::new_with(width, height, false),
            wind_speed: Tilemap::new_with(width, height, 5.0),
        }
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        assert_eq!(spectral_colormap(1.0), [158, 0, 66]);
        assert_eq!(spectral_colormap(0.5), [255, 255, 191]);
        // Half way between the third and fourth stops
        assert_eq!(spectral_colormap(0.25), [137, 208, 165]);
        assert_eq!(spectral_colormap(-0.5), spectral_colormap(0.0));
    }

    #[test]
    fn test_frame_overlays() {
        let heightmap = Tilemap::new_with(3, 3, 1700.0f32);
        let mut day = snapshot(3, 3);
        day.cloud.set(0, 0, true);
        day.cloud.set(1, 1, true);
        day.rain.set(1, 1, true);

        let values = day_frame_values(&heightmap, &day);
        assert_eq!(*values.get(0, 0), FRAME_CLOUD);
        assert_eq!(*values.get(1, 1), FRAME_RAIN);
        assert!((*values.get(2, 2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_exports_write_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let heightmap = Tilemap::new_with(6, 4, 900.0f32);

        let field_path = dir.path().join("field.png");
        export_scalar_field(&heightmap, None, &field_path).unwrap();
        let img = image::open(&field_path).unwrap();
        assert_eq!((img.width(), img.height()), (6, 4));

        let biomes = Tilemap::new_with(6, 4, 3u8);
        let biome_path = dir.path().join("biomes.png");
        export_biome_map(&biomes, BiomeScheme::Whittaker, &biome_path).unwrap();
        let img = image::open(&biome_path).unwrap().into_rgb8();
        let expected = BiomeScheme::Whittaker.biome_color(3);
        assert_eq!(img.get_pixel(2, 1).0, [expected.0, expected.1, expected.2]);

        let frame_path = dir.path().join("frame.png");
        export_day_frame(&heightmap, &snapshot(6, 4), &frame_path).unwrap();
        assert!(frame_path.exists());
    }

    #[test]
    fn test_replayed_frame_exports() {
        let heightmap = crate::heightmap::synthetic(12, 10, 3);
        let mut run = crate::display::DisplayRun::new(&heightmap, 3, &ClimateParams::default()).unwrap();
        let day = run.advance();
        let dir = tempfile::tempdir().unwrap();
        export_day_frame(&heightmap, &day, dir.path().join("day_000.png")).unwrap();
    }
}
