//! Daily climate simulation over a heightmap
//!
//! A [`ClimateState`] holds the per-cell temperature, humidity, cloud and
//! rain fields of one simulation instance. Each simulated day runs, in this
//! order: wind, temperature, humidity, rain/cloud. Later stages read the
//! fields earlier stages produced on the same day; every stage reads only
//! the previous snapshot of the field it rewrites, so cells are independent
//! and computed in parallel.
//!
//! Only interior cells are simulated. The outermost ring keeps its initial
//! values forever and acts as a fixed boundary for the smoothing kernels.

use tracing::debug;

use crate::error::{ClimateError, Result};
use crate::params::ClimateParams;
use crate::tilemap::Tilemap;
use crate::wind::{compute_wind_speed, WindModel, WindVector};

/// Sky state of a cell, decoded from the cloud and rain flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weather {
    Clear,
    Cloudy,
    Raining,
}

impl Weather {
    /// Rain wins over cloud: a raining cell may carry either cloud flag.
    pub fn from_flags(cloud: bool, rain: bool) -> Self {
        match (cloud, rain) {
            (_, true) => Weather::Raining,
            (true, false) => Weather::Cloudy,
            (false, false) => Weather::Clear,
        }
    }
}

/// Mutable climate state of one simulation instance.
#[derive(Clone)]
pub struct ClimateState<'a> {
    heightmap: &'a Tilemap<f32>,
    params: ClimateParams,
    wind_model: WindModel,
    day: u32,

    temperature: Tilemap<f32>,
    humidity: Tilemap<f32>,
    cloud: Tilemap<bool>,
    rain: Tilemap<bool>,
    wind_speed: Tilemap<f32>,
    wind_direction: WindVector,
}

impl<'a> ClimateState<'a> {
    /// Initialize a state for `start_day`.
    ///
    /// Temperature and humidity are seeded from elevation, the sky starts
    /// clear and the wind is computed for the start day.
    pub fn new(heightmap: &'a Tilemap<f32>, seed: u64, start_day: u32, params: &ClimateParams) -> Result<Self> {
        let (width, height) = (heightmap.width, heightmap.height);
        if width <= 2 || height <= 2 {
            return Err(ClimateError::GridTooSmall { width, height });
        }
        params.validate()?;

        let init = &params.initial;
        let temperature = heightmap.map(|&h| {
            if h > init.sea_level {
                (1.0 - h / init.lapse_scale).clamp(0.0, 1.0)
            } else {
                init.sea_temperature
            }
        });
        let humidity = heightmap.map(|&h| {
            if h <= init.sea_level {
                init.sea_humidity
            } else {
                init.land_humidity
            }
        });

        let mut state = Self {
            heightmap,
            params: params.clone(),
            wind_model: WindModel::new(seed, params.simulation.year_length_days),
            day: start_day,
            temperature,
            humidity,
            cloud: Tilemap::new_with(width, height, false),
            rain: Tilemap::new_with(width, height, false),
            wind_speed: Tilemap::new_with(width, height, 0.0),
            wind_direction: WindVector::CALM,
        };
        state.compute_wind(start_day);
        Ok(state)
    }

    /// Simulate one day: wind, temperature, humidity, then rain and cloud.
    pub fn advance(&mut self, day: u32) {
        self.compute_wind(day);
        self.run_day_fields();
        self.day = day;
        self.log_day();
    }

    /// Simulate one day under a fixed wind direction instead of the noise.
    pub fn advance_with_wind(&mut self, day: u32, direction: WindVector) {
        self.set_wind(direction);
        self.run_day_fields();
        self.day = day;
        self.log_day();
    }

    fn run_day_fields(&mut self) {
        self.update_temperature();
        self.update_humidity();
        self.update_precipitation();
    }

    fn log_day(&self) {
        debug!(
            day = self.day,
            wind_x = self.wind_direction.x,
            wind_y = self.wind_direction.y,
            raining = self.rain.as_slice().iter().filter(|&&r| r).count(),
            cloudy = self.cloud.as_slice().iter().filter(|&&c| c).count(),
            "climate day"
        );
    }

    /// Sample the global wind direction for `day` and rebuild the speed field.
    pub fn compute_wind(&mut self, day: u32) {
        let direction = self.wind_model.direction(day);
        self.set_wind(direction);
    }

    /// Override the global wind direction and rebuild the speed field.
    pub fn set_wind(&mut self, direction: WindVector) {
        self.wind_direction = direction;
        compute_wind_speed(self.heightmap, direction, &self.params.wind, &mut self.wind_speed);
    }

    /// Upwind source cell of `(x, y)` for today's wind.
    pub fn upwind_cell(&self, x: usize, y: usize) -> (usize, usize) {
        let distance = self.params.wind.advection_scale * *self.wind_speed.get(x, y);
        let (dx, dy) = self.wind_direction.rounded_offset(distance);
        self.heightmap.upwind(x, y, dx, dy)
    }

    /// Move yesterday's values one day downwind.
    fn advect(&self, field: &Tilemap<f32>) -> Tilemap<f32> {
        let mut transported = field.clone();
        transported.par_update_interior(|x, y| {
            let (ux, uy) = self.upwind_cell(x, y);
            *field.get(ux, uy)
        });
        transported
    }

    /// Advect, smooth over the diagonals and apply heating and cooling.
    pub fn update_temperature(&mut self) {
        let transported = self.advect(&self.temperature);
        let mut next = self.temperature.clone();
        next.par_update_interior(|x, y| {
            let mut sum = *transported.get(x, y);
            for (nx, ny) in transported.diagonal_neighbors(x, y) {
                sum += *transported.get(nx, ny);
            }
            next_temperature(
                sum / 5.0,
                *self.wind_speed.get(x, y),
                *self.heightmap.get(x, y),
                *self.cloud.get(x, y),
                *self.rain.get(x, y),
                &self.params,
            )
        });
        self.temperature = next;
    }

    /// Advect, smooth over the full 3x3 block and apply evaporation and rain.
    pub fn update_humidity(&mut self) {
        let transported = self.advect(&self.humidity);
        let mut next = self.humidity.clone();
        next.par_update_interior(|x, y| {
            let mut sum = *transported.get(x, y);
            for (nx, ny) in transported
                .diagonal_neighbors(x, y)
                .into_iter()
                .chain(transported.orthogonal_neighbors(x, y))
            {
                sum += *transported.get(nx, ny);
            }
            next_humidity(
                sum / 9.0,
                *self.temperature.get(x, y),
                *self.heightmap.get(x, y),
                *self.cloud.get(x, y),
                *self.rain.get(x, y),
                &self.params,
            )
        });
        self.humidity = next;
    }

    /// Re-derive cloud and rain from today's humidity and temperature.
    pub fn update_precipitation(&mut self) {
        let mut sky = Tilemap::new_with(self.width(), self.height(), (false, false));
        sky.par_fill_with(|x, y| {
            if !self.heightmap.is_interior(x, y) {
                return (*self.cloud.get(x, y), *self.rain.get(x, y));
            }
            let (ux, uy) = self.upwind_cell(x, y);
            sky_transition(
                *self.humidity.get(x, y),
                *self.temperature.get(x, y),
                *self.cloud.get(ux, uy),
                *self.rain.get(ux, uy),
                &self.params,
            )
        });
        self.cloud = sky.map(|&(cloud, _)| cloud);
        self.rain = sky.map(|&(_, rain)| rain);
    }

    pub fn heightmap(&self) -> &Tilemap<f32> {
        self.heightmap
    }

    pub fn params(&self) -> &ClimateParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.heightmap.width
    }

    pub fn height(&self) -> usize {
        self.heightmap.height
    }

    /// Day of the most recent update.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn temperature(&self) -> &Tilemap<f32> {
        &self.temperature
    }

    pub fn humidity(&self) -> &Tilemap<f32> {
        &self.humidity
    }

    pub fn cloud(&self) -> &Tilemap<bool> {
        &self.cloud
    }

    pub fn rain(&self) -> &Tilemap<bool> {
        &self.rain
    }

    pub fn wind_speed(&self) -> &Tilemap<f32> {
        &self.wind_speed
    }

    pub fn wind_direction(&self) -> WindVector {
        self.wind_direction
    }

    pub fn weather_at(&self, x: usize, y: usize) -> Weather {
        Weather::from_flags(*self.cloud.get(x, y), *self.rain.get(x, y))
    }
}

/// Temperature after source and sink terms, clamped to `[0, 1]`.
///
/// Warming pulls toward 1 in proportion to the remaining headroom; cooling
/// scales with the current temperature.
pub fn next_temperature(
    smoothed: f32,
    wind_speed: f32,
    elevation: f32,
    cloudy: bool,
    raining: bool,
    params: &ClimateParams,
) -> f32 {
    let p = &params.temperature;

    // Air pushed uphill cools, air falling from higher ground warms
    let cool = p.cooling_rate * (wind_speed - params.wind.base_speed);
    let sun = if cloudy {
        0.0
    } else {
        (1.0 - elevation / p.solar_elevation_scale) * p.solar_gain
    };
    let rain = if raining && smoothed > 0.0 { -p.rain_cooling } else { 0.0 };

    let t = smoothed + p.warming_blend * (1.0 - smoothed) * sun + p.cooling_blend * smoothed * (rain + cool);
    t.clamp(0.0, 1.0)
}

/// Humidity after evaporation and rain-out, clamped to `[0, 1]`.
pub fn next_humidity(
    smoothed: f32,
    temperature: f32,
    elevation: f32,
    cloudy: bool,
    raining: bool,
    params: &ClimateParams,
) -> f32 {
    let p = &params.humidity;

    let evaporation = if cloudy {
        0.0
    } else if elevation <= params.initial.sea_level {
        p.sea_evaporation * temperature
    } else {
        p.land_evaporation
    };
    let rain = if raining { -smoothed * p.rain_depletion } else { 0.0 };

    let h = smoothed + smoothed * rain + (1.0 - smoothed) * evaporation;
    h.clamp(0.0, 1.0)
}

/// Next `(cloud, rain)` flags of a cell.
///
/// Raining cells take their cloud flag from the upwind cell, cloudy cells
/// take their rain flag from it, so weather drifts with the wind instead of
/// persisting in place.
pub fn sky_transition(
    humidity: f32,
    temperature: f32,
    upwind_cloud: bool,
    upwind_rain: bool,
    params: &ClimateParams,
) -> (bool, bool) {
    let p = &params.precipitation;
    if humidity >= p.rain_threshold(temperature) {
        (upwind_cloud, true)
    } else if humidity >= p.cloud_threshold(temperature) {
        (true, upwind_rain)
    } else {
        (false, false)
    }
}
