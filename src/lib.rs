//! Climate simulation and biome classification for heightmap worlds
//!
//! Re-exports modules for use by binaries and tools.

pub mod averaging;
pub mod biomes;
pub mod climate;
pub mod display;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod params;
pub mod seeds;
pub mod tilemap;
pub mod wind;
pub mod world;

pub use error::{ClimateError, Result};
