//! Debug script to output biomes of every scheme as ASCII maps

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

use tracing_subscriber::EnvFilter;

use planet_climate::biomes::{classify_map, BiomeScheme};
use planet_climate::heightmap::synthetic;
use planet_climate::params::ClimateParams;
use planet_climate::seeds::ClimateSeeds;
use planet_climate::world::generate_climate;

/// One glyph per biome id, indexed by id.
fn glyphs(scheme: BiomeScheme) -> &'static [u8] {
    match scheme {
        // Water, sandy, gravel, cliffs, wet/dry plains, rocky, temperate, boreal, tundra, peak
        BiomeScheme::Banded => b"~.:#gsRfBT^",
        BiomeScheme::Whittaker => b"~RSdFfwgBT",
        BiomeScheme::WhittakerExtended => b"~RSdFfwgBTc*HWv",
        BiomeScheme::Redblob => b"~TtsFRSdfeg*bx",
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let width = 128;
    let height = 64;
    let seed = 12345u64;

    let seeds = ClimateSeeds::from_master(seed);
    let params = ClimateParams::default();
    let heightmap = synthetic(width, height, seeds.terrain);

    // The averages do not depend on the scheme; classify the others from the same run
    let world = generate_climate(&heightmap, &seeds, &params, BiomeScheme::Banded)?;

    for scheme in BiomeScheme::ALL {
        let biomes = if scheme == world.scheme {
            world.biomes.clone()
        } else {
            classify_map(scheme, &heightmap, &world.averages, &params.biomes, &seeds)
        };
        let table = glyphs(scheme);

        let path = format!("biome_debug_{scheme}.txt");
        let mut file = BufWriter::new(File::create(&path)?);

        let title = scheme.name().to_uppercase();
        writeln!(file, "=== {title} BIOME DEBUG MAP ({width}x{height}) seed={seed} ===")?;
        writeln!(file)?;
        writeln!(file, "LEGEND:")?;
        for (id, name) in scheme.legend() {
            writeln!(file, "  {} = {}", table[id as usize] as char, name)?;
        }
        writeln!(file)?;

        writeln!(file, "BIOME MAP:")?;
        let mut counts = vec![0usize; table.len()];
        for y in 0..height {
            let mut line = String::with_capacity(width);
            for x in 0..width {
                let id = *biomes.get(x, y) as usize;
                if let Some(n) = counts.get_mut(id) {
                    *n += 1;
                }
                line.push(table.get(id).map(|&c| c as char).unwrap_or('?'));
            }
            writeln!(file, "{line}")?;
        }
        writeln!(file)?;

        writeln!(file, "BIOME COUNTS:")?;
        for (id, name) in scheme.legend() {
            let count = counts[id as usize];
            if count > 0 {
                let share = 100.0 * count as f64 / (width * height) as f64;
                writeln!(file, "  {name:<36} {count:>6} ({share:.1}%)")?;
            }
        }
        file.flush()?;

        println!("Wrote {path}");
    }

    Ok(())
}
