//! Day-by-day replay for visualization
//!
//! A [`DisplayRun`] is a second simulation, independent of the averaging
//! run, that exists only to hand out per-day snapshots. It never feeds back
//! into the averages or the biome map. Started from the same heightmap and
//! seed it retraces the averaging run exactly.

use crate::climate::{ClimateState, Weather};
use crate::error::Result;
use crate::params::ClimateParams;
use crate::tilemap::Tilemap;
use crate::wind::WindVector;

/// Owned copy of one settled day.
#[derive(Clone, Debug, PartialEq)]
pub struct DaySnapshot {
    pub day: u32,
    pub wind_direction: WindVector,
    pub temperature: Tilemap<f32>,
    pub humidity: Tilemap<f32>,
    pub cloud: Tilemap<bool>,
    pub rain: Tilemap<bool>,
    pub wind_speed: Tilemap<f32>,
}

impl DaySnapshot {
    pub fn capture(state: &ClimateState) -> Self {
        Self {
            day: state.day(),
            wind_direction: state.wind_direction(),
            temperature: state.temperature().clone(),
            humidity: state.humidity().clone(),
            cloud: state.cloud().clone(),
            rain: state.rain().clone(),
            wind_speed: state.wind_speed().clone(),
        }
    }

    pub fn weather_at(&self, x: usize, y: usize) -> Weather {
        Weather::from_flags(*self.cloud.get(x, y), *self.rain.get(x, y))
    }
}

/// Retained simulation that advances one day per request.
pub struct DisplayRun<'a> {
    state: ClimateState<'a>,
    next_day: u32,
}

impl<'a> DisplayRun<'a> {
    pub fn new(heightmap: &'a Tilemap<f32>, seed: u64, params: &ClimateParams) -> Result<Self> {
        Ok(Self {
            state: ClimateState::new(heightmap, seed, 0, params)?,
            next_day: 0,
        })
    }

    /// Simulate the next day and capture it.
    pub fn advance(&mut self) -> DaySnapshot {
        self.state.advance(self.next_day);
        self.next_day += 1;
        DaySnapshot::capture(&self.state)
    }

    /// The live state, for collaborators that only need to peek.
    pub fn state(&self) -> &ClimateState<'a> {
        &self.state
    }

    /// Days simulated so far.
    pub fn days_run(&self) -> u32 {
        self.next_day
    }
}

impl Iterator for DisplayRun<'_> {
    type Item = DaySnapshot;

    fn next(&mut self) -> Option<DaySnapshot> {
        Some(self.advance())
    }
}
