use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use planet_climate::biomes::BiomeScheme;
use planet_climate::export::{export_biome_map, export_day_frame, export_scalar_field};
use planet_climate::heightmap;
use planet_climate::params::ClimateParams;
use planet_climate::seeds::ClimateSeeds;
use planet_climate::world::{display_run, generate_climate};

#[derive(Parser, Debug)]
#[command(name = "planet_climate")]
#[command(about = "Simulate a year of weather over a heightmap and classify biomes")]
struct Args {
    /// Width of the synthetic heightmap in cells (default: 256)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the synthetic heightmap in cells (default: 128)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grayscale PNG heightmap; black is -300 m, white 3700 m
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// JSON parameter file; missing fields keep their defaults
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Years to average over (overrides the parameter file)
    #[arg(short, long)]
    years: Option<u32>,

    /// Biome classification scheme
    #[arg(long, value_enum, default_value_t = BiomeScheme::Banded)]
    scheme: BiomeScheme,

    /// Output directory for PNG exports
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Replay this many days and export one frame per day
    #[arg(long, default_value = "0")]
    frames: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut params = match &args.params {
        Some(path) => ClimateParams::from_json_file(path)?,
        None => ClimateParams::default(),
    };
    if let Some(years) = args.years {
        params.simulation.years = years;
        params.validate()?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = ClimateSeeds::from_master(seed);
    info!(%seeds, "seeds");

    let heightmap = match &args.heightmap {
        Some(path) => {
            if args.width.is_some() || args.height.is_some() {
                warn!("--width/--height are ignored when a heightmap file is given");
            }
            heightmap::load_png(path)?
        }
        None => heightmap::synthetic(args.width.unwrap_or(256), args.height.unwrap_or(128), seeds.terrain),
    };
    if let Some((lo, hi)) = heightmap.min_max() {
        info!(width = heightmap.width, height = heightmap.height, "heightmap range {lo:.1}m to {hi:.1}m");
    }

    let world = generate_climate(&heightmap, &seeds, &params, args.scheme)?;

    fs::create_dir_all(&args.output)?;
    let out = |name: &str| args.output.join(name);
    export_scalar_field(&heightmap, None, out("terrain.png"))?;
    export_scalar_field(&world.averages.avg_temp, Some((0.0, 1.0)), out("avg_temp.png"))?;
    export_scalar_field(&world.averages.avg_humidity, Some((0.0, 1.0)), out("avg_humidity.png"))?;
    export_scalar_field(&world.averages.avg_cloud, Some((0.0, 1.0)), out("avg_cloud.png"))?;
    export_scalar_field(&world.averages.avg_rain, None, out("avg_rain.png"))?;
    export_scalar_field(&world.averages.avg_wind, None, out("avg_wind.png"))?;
    export_biome_map(&world.biomes, world.scheme, out(&format!("biomes_{}.png", world.scheme)))?;

    for (id, count) in world.biome_histogram() {
        let name = world.scheme.biome_name(id).unwrap_or("Unknown");
        let share = 100.0 * count as f64 / (world.width * world.height) as f64;
        info!("{name:>36}: {count:>7} cells ({share:.1}%)");
    }

    if args.frames > 0 {
        info!(frames = args.frames, "replaying days for frame export");
        let replay = display_run(&heightmap, &seeds, &params)?;
        for snapshot in replay.take(args.frames as usize) {
            export_day_frame(&heightmap, &snapshot, out(&format!("day_{:03}.png", snapshot.day)))?;
        }
    }

    info!(output = %args.output.display(), "done");
    Ok(())
}
