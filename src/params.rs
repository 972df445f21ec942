//! Tunable constants of the climate simulation and biome classification
//!
//! Defaults are the empirically tuned values the update rules were designed
//! around. Every group deserializes with `#[serde(default)]`, so a parameter
//! file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClimateError, Result};

/// Main configuration for a climate run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParams {
    pub simulation: SimulationParams,
    pub initial: InitialParams,
    pub wind: WindParams,
    pub temperature: TemperatureParams,
    pub humidity: HumidityParams,
    pub precipitation: PrecipitationParams,
    pub biomes: BiomeParams,
}

/// Run schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Days per simulated year; also the period of the wind noise input
    pub year_length_days: u32,
    /// Years simulated by the averaging run
    pub years: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            year_length_days: 365,
            years: 1,
        }
    }
}

impl SimulationParams {
    /// Length of the averaging run; saturates for schedules `validate` rejects.
    pub fn total_days(&self) -> u32 {
        self.year_length_days.saturating_mul(self.years)
    }
}

/// Initial conditions seeded from elevation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialParams {
    /// Elevation (m) at or below which a cell counts as sea
    pub sea_level: f32,
    /// Starting temperature of sea cells
    pub sea_temperature: f32,
    /// Land starts at `1 - elevation / lapse_scale`
    pub lapse_scale: f32,
    /// Starting humidity of sea cells
    pub sea_humidity: f32,
    /// Starting humidity of land cells
    pub land_humidity: f32,
}

impl Default for InitialParams {
    fn default() -> Self {
        Self {
            sea_level: 200.0,
            sea_temperature: 0.7,
            lapse_scale: 2000.0,
            sea_humidity: 0.4,
            land_humidity: 0.2,
        }
    }
}

/// Wind direction and speed model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    /// Cells between a cell and the terrain sample used for its slope
    pub upwind_distance: f32,
    /// Speed over flat ground
    pub base_speed: f32,
    /// Elevation difference (m) that stops the wind entirely
    pub slope_scale: f32,
    /// Cells travelled per unit of wind speed per day by advected fields
    pub advection_scale: f32,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            upwind_distance: 10.0,
            base_speed: 5.0,
            slope_scale: 1000.0,
            advection_scale: 2.0,
        }
    }
}

/// Temperature source and sink terms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureParams {
    /// Cooling per unit of wind speed above `WindParams::base_speed`
    pub cooling_rate: f32,
    /// Solar warming at sea level under a clear sky
    pub solar_gain: f32,
    /// Elevation (m) at which solar warming vanishes
    pub solar_elevation_scale: f32,
    /// Cooling applied while raining
    pub rain_cooling: f32,
    /// Weight of warming terms, pulling toward 1
    pub warming_blend: f32,
    /// Weight of cooling terms, scaled by the current temperature
    pub cooling_blend: f32,
}

impl Default for TemperatureParams {
    fn default() -> Self {
        Self {
            cooling_rate: 0.5,
            solar_gain: 0.008,
            solar_elevation_scale: 2000.0,
            rain_cooling: 0.01,
            warming_blend: 0.8,
            cooling_blend: 0.6,
        }
    }
}

/// Humidity source and sink terms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumidityParams {
    /// Evaporation per unit temperature over sea under a clear sky
    pub sea_evaporation: f32,
    /// Flat evaporation over land under a clear sky
    pub land_evaporation: f32,
    /// Fraction of humidity removed by a day of rain
    pub rain_depletion: f32,
}

impl Default for HumidityParams {
    fn default() -> Self {
        Self {
            sea_evaporation: 0.05,
            land_evaporation: 0.01,
            rain_depletion: 0.8,
        }
    }
}

/// Saturation thresholds of the rain/cloud state machine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecipitationParams {
    /// Rain when `humidity >= rain_base + rain_temperature * temperature`
    pub rain_base: f32,
    pub rain_temperature: f32,
    /// Cloud when `humidity >= cloud_base + cloud_temperature * temperature`
    pub cloud_base: f32,
    pub cloud_temperature: f32,
}

impl Default for PrecipitationParams {
    fn default() -> Self {
        Self {
            rain_base: 0.35,
            rain_temperature: 0.5,
            cloud_base: 0.30,
            cloud_temperature: 0.3,
        }
    }
}

impl PrecipitationParams {
    pub fn rain_threshold(&self, temperature: f32) -> f32 {
        self.rain_base + self.rain_temperature * temperature
    }

    pub fn cloud_threshold(&self, temperature: f32) -> f32 {
        self.cloud_base + self.cloud_temperature * temperature
    }
}

/// Biome classification thresholds and unit conversions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeParams {
    // Elevation bands (m, upper bounds, inclusive)
    pub water: f32,
    pub sandy_beach: f32,
    pub gravel_beach: f32,
    pub beach_cliffs: f32,
    pub plains: f32,
    pub hills: f32,
    /// Hills at or below this are temperate forest, above it boreal
    pub temperate_forest: f32,
    pub mountain_tundra: f32,

    /// Plains with at least this average rain are wet plains
    pub wet_plains_rain: f32,
    /// Hills drier than this may be rocky
    pub rocky_hills_rain: f32,
    /// Rocky hills stay this many cells away from the map edge
    pub jitter_margin: i64,

    // Conversion of averaged fields for the lookup schemes
    /// Temperature (°C) of an average temperature of 0
    pub temp_min_c: f32,
    /// Temperature (°C) of an average temperature of 1
    pub temp_max_c: f32,
    /// Precipitation (dm/year) of a cell where it always rains
    pub precipitation_scale_dm: f32,
    /// Elevation (m) of the top of the highest redblob zone
    pub redblob_peak: f32,
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            water: 200.0,
            sandy_beach: 204.0,
            gravel_beach: 210.0,
            beach_cliffs: 220.0,
            plains: 600.0,
            hills: 1300.0,
            temperate_forest: 1100.0,
            mountain_tundra: 1500.0,
            wet_plains_rain: 0.02,
            rocky_hills_rain: 0.001,
            jitter_margin: 5,
            temp_min_c: -15.0,
            temp_max_c: 30.0,
            precipitation_scale_dm: 45.0,
            redblob_peak: 3700.0,
        }
    }
}

impl BiomeParams {
    /// Degrees Celsius for an averaged temperature in `[0, 1]`.
    pub fn to_celsius(&self, avg_temp: f32) -> f32 {
        self.temp_min_c + avg_temp * (self.temp_max_c - self.temp_min_c)
    }

    /// Decimeters per year for an averaged rain fraction in `[0, 1]`.
    pub fn to_decimeters(&self, avg_rain: f32) -> f32 {
        avg_rain * self.precipitation_scale_dm
    }
}

impl ClimateParams {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject parameter sets the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ClimateError::InvalidParams(msg.to_string()));

        if self.simulation.year_length_days == 0 {
            return invalid("year_length_days must be positive");
        }
        if self.simulation.years == 0 {
            return invalid("years must be positive");
        }
        if self.simulation.year_length_days.checked_mul(self.simulation.years).is_none() {
            return invalid("year_length_days * years overflows the day counter");
        }

        let finite = [
            self.initial.sea_level,
            self.initial.sea_temperature,
            self.initial.lapse_scale,
            self.initial.sea_humidity,
            self.initial.land_humidity,
            self.wind.upwind_distance,
            self.wind.base_speed,
            self.wind.slope_scale,
            self.wind.advection_scale,
            self.temperature.cooling_rate,
            self.temperature.solar_gain,
            self.temperature.solar_elevation_scale,
            self.temperature.rain_cooling,
            self.temperature.warming_blend,
            self.temperature.cooling_blend,
            self.humidity.sea_evaporation,
            self.humidity.land_evaporation,
            self.humidity.rain_depletion,
            self.precipitation.rain_base,
            self.precipitation.rain_temperature,
            self.precipitation.cloud_base,
            self.precipitation.cloud_temperature,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return invalid("all climate constants must be finite");
        }
        if self.initial.lapse_scale == 0.0
            || self.wind.slope_scale == 0.0
            || self.temperature.solar_elevation_scale == 0.0
        {
            return invalid("elevation scales must be non-zero");
        }

        let b = &self.biomes;
        let bands = [
            b.water,
            b.sandy_beach,
            b.gravel_beach,
            b.beach_cliffs,
            b.plains,
            b.hills,
            b.mountain_tundra,
        ];
        if bands.windows(2).any(|w| !(w[0] <= w[1])) {
            return invalid("biome elevation bands must be ascending");
        }
        if !(b.plains <= b.temperate_forest && b.temperate_forest <= b.hills) {
            return invalid("temperate_forest must lie inside the hills band");
        }
        if !(b.temp_min_c < b.temp_max_c) {
            return invalid("temp_min_c must be below temp_max_c");
        }
        if !(b.redblob_peak > b.water) {
            return invalid("redblob_peak must be above the water band");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ClimateParams::default().validate().is_ok());
        assert_eq!(ClimateParams::default().simulation.total_days(), 365);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params = ClimateParams::from_json_str(r#"{ "simulation": { "years": 3 } }"#).unwrap();
        assert_eq!(params.simulation.years, 3);
        assert_eq!(params.simulation.year_length_days, 365);
        assert_eq!(params.wind, WindParams::default());
    }

    #[test]
    fn test_zero_years_rejected() {
        let err = ClimateParams::from_json_str(r#"{ "simulation": { "years": 0 } }"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_overflowing_schedule_rejected() {
        let mut params = ClimateParams::default();
        params.simulation.years = 11_767_035;
        let err = params.validate().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(params.simulation.total_days(), u32::MAX);

        params.simulation.years = 11_767_033;
        assert!(params.validate().is_ok());
        assert_eq!(params.simulation.total_days(), 365 * 11_767_033);
    }

    #[test]
    fn test_unordered_bands_rejected() {
        let mut params = ClimateParams::default();
        params.biomes.plains = 100.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_not_configuration() {
        let err = ClimateParams::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ClimateError::Json(_)));
    }

    #[test]
    fn test_thresholds() {
        let p = PrecipitationParams::default();
        assert!((p.rain_threshold(1.0) - 0.85).abs() < 1e-6);
        assert!((p.cloud_threshold(0.0) - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_unit_conversions() {
        let b = BiomeParams::default();
        assert_eq!(b.to_celsius(0.0), -15.0);
        assert_eq!(b.to_celsius(1.0), 30.0);
        assert_eq!(b.to_decimeters(0.5), 22.5);
    }
}
