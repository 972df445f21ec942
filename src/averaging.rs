//! Long-run climate norms
//!
//! An [`AveragingRun`] owns a fresh [`ClimateState`] started at day 0 and
//! folds every simulated day into running means. The run is consumed when
//! it finishes; only the averages survive.

use rayon::prelude::*;
use tracing::info;

use crate::climate::ClimateState;
use crate::error::Result;
use crate::params::ClimateParams;
use crate::tilemap::Tilemap;

/// Incremental mean after folding in the sample of day `i` (0-indexed).
#[inline]
pub fn running_mean(avg: f32, value: f32, i: u32) -> f32 {
    let i = i as f32;
    (avg * i + value) / (i + 1.0)
}

/// Per-cell means over every day recorded so far.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateAverages {
    /// Fraction of days with rain
    pub avg_rain: Tilemap<f32>,
    pub avg_wind: Tilemap<f32>,
    /// Fraction of days with cloud cover
    pub avg_cloud: Tilemap<f32>,
    pub avg_temp: Tilemap<f32>,
    pub avg_humidity: Tilemap<f32>,
    /// Number of days folded in
    pub days: u32,
}

impl ClimateAverages {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            avg_rain: Tilemap::new(width, height),
            avg_wind: Tilemap::new(width, height),
            avg_cloud: Tilemap::new(width, height),
            avg_temp: Tilemap::new(width, height),
            avg_humidity: Tilemap::new(width, height),
            days: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.avg_temp.width
    }

    pub fn height(&self) -> usize {
        self.avg_temp.height
    }

    /// Fold one settled day into every mean.
    pub fn record(&mut self, state: &ClimateState) {
        let i = self.days;
        fold_scalar(&mut self.avg_temp, state.temperature(), i);
        fold_scalar(&mut self.avg_humidity, state.humidity(), i);
        fold_scalar(&mut self.avg_wind, state.wind_speed(), i);
        fold_flag(&mut self.avg_rain, state.rain(), i);
        fold_flag(&mut self.avg_cloud, state.cloud(), i);
        self.days += 1;
    }
}

fn fold_scalar(avg: &mut Tilemap<f32>, today: &Tilemap<f32>, i: u32) {
    avg.as_mut_slice()
        .par_iter_mut()
        .zip(today.as_slice().par_iter())
        .for_each(|(a, &v)| *a = running_mean(*a, v, i));
}

fn fold_flag(avg: &mut Tilemap<f32>, today: &Tilemap<bool>, i: u32) {
    avg.as_mut_slice()
        .par_iter_mut()
        .zip(today.as_slice().par_iter())
        .for_each(|(a, &v)| *a = running_mean(*a, if v { 1.0 } else { 0.0 }, i));
}

/// Ephemeral simulation that exists only to produce [`ClimateAverages`].
pub struct AveragingRun<'a> {
    state: ClimateState<'a>,
    averages: ClimateAverages,
    total_days: u32,
}

impl<'a> AveragingRun<'a> {
    pub fn new(heightmap: &'a Tilemap<f32>, seed: u64, params: &ClimateParams) -> Result<Self> {
        let state = ClimateState::new(heightmap, seed, 0, params)?;
        Ok(Self {
            averages: ClimateAverages::new(heightmap.width, heightmap.height),
            total_days: params.simulation.total_days(),
            state,
        })
    }

    /// Days still to simulate.
    pub fn remaining(&self) -> u32 {
        self.total_days - self.averages.days
    }

    pub fn is_finished(&self) -> bool {
        self.averages.days >= self.total_days
    }

    /// Simulate the next day and fold it into the means.
    ///
    /// Returns false once the schedule is complete.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.state.advance(self.averages.days);
        self.averages.record(&self.state);
        true
    }

    /// Means over the days completed so far.
    pub fn averages(&self) -> &ClimateAverages {
        &self.averages
    }

    pub fn state(&self) -> &ClimateState<'a> {
        &self.state
    }

    /// Run the remaining schedule.
    pub fn run(self) -> ClimateAverages {
        self.run_with(|_| {})
    }

    /// Run the remaining schedule, handing each settled day to `observer`.
    pub fn run_with<F: FnMut(&ClimateState)>(mut self, mut observer: F) -> ClimateAverages {
        let (width, height) = (self.state.width(), self.state.height());
        info!(width, height, days = self.remaining(), "averaging climate");

        while self.step() {
            observer(&self.state);

            let year_length = self.state.params().simulation.year_length_days;
            if self.averages.days % year_length == 0 {
                info!(year = self.averages.days / year_length, "simulated year complete");
            }
        }

        info!(
            mean_temp = self.averages.avg_temp.mean(),
            mean_humidity = self.averages.avg_humidity.mean(),
            mean_rain = self.averages.avg_rain.mean(),
            "climate averages ready"
        );
        self.averages
    }
}

/// Run a full averaging schedule and return the means.
pub fn compute_averages(heightmap: &Tilemap<f32>, seed: u64, params: &ClimateParams) -> Result<ClimateAverages> {
    Ok(AveragingRun::new(heightmap, seed, params)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wind::WindVector;
    use approx::assert_relative_eq;

    fn hills(width: usize, height: usize) -> Tilemap<f32> {
        let mut map = Tilemap::new_with(width, height, 0.0f32);
        for x in 0..width {
            for y in 0..height {
                let h = 150.0 + 120.0 * x as f32 + 40.0 * ((y as f32) * 0.7).sin();
                map.set(x, y, h);
            }
        }
        map
    }

    fn short_params(days: u32) -> ClimateParams {
        let mut params = ClimateParams::default();
        params.simulation.year_length_days = days;
        params
    }

    #[test]
    fn test_running_mean_formula() {
        let values = [0.2f32, 0.9, 0.4, 0.1];
        let mut avg = 0.0;
        for (i, &v) in values.iter().enumerate() {
            avg = running_mean(avg, v, i as u32);
        }
        assert_relative_eq!(avg, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_averages_match_recorded_log() {
        let map = hills(14, 10);
        let params = short_params(40);
        let mut temps = Vec::new();
        let mut rain = Vec::new();
        let mut wind = Vec::new();

        let averages = AveragingRun::new(&map, 11, &params).unwrap().run_with(|state| {
            temps.push(state.temperature().clone());
            rain.push(state.rain().clone());
            wind.push(state.wind_speed().clone());
        });

        assert_eq!(averages.days, 40);
        assert_eq!(temps.len(), 40);
        for (x, y) in [(0, 0), (3, 4), (7, 5), (12, 8)] {
            let n = temps.len() as f64;
            let t: f64 = temps.iter().map(|m| *m.get(x, y) as f64).sum::<f64>() / n;
            let r: f64 = rain.iter().filter(|m| *m.get(x, y)).count() as f64 / n;
            let w: f64 = wind.iter().map(|m| *m.get(x, y) as f64).sum::<f64>() / n;
            assert_relative_eq!(*averages.avg_temp.get(x, y) as f64, t, epsilon = 1e-4);
            assert_relative_eq!(*averages.avg_rain.get(x, y) as f64, r, epsilon = 1e-4);
            assert_relative_eq!(*averages.avg_wind.get(x, y) as f64, w, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_partial_run_is_valid_mean() {
        let map = hills(10, 10);
        let mut run = AveragingRun::new(&map, 2, &short_params(30)).unwrap();
        for _ in 0..5 {
            assert!(run.step());
        }
        assert_eq!(run.averages().days, 5);
        assert_eq!(run.remaining(), 25);
        for &v in run.averages().avg_cloud.as_slice() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_step_stops_after_schedule() {
        let map = hills(5, 5);
        let mut run = AveragingRun::new(&map, 2, &short_params(3)).unwrap();
        assert!(run.step() && run.step() && run.step());
        assert!(!run.step());
        assert!(run.is_finished());
        assert_eq!(run.averages().days, 3);
    }

    #[test]
    fn test_same_seed_same_averages() {
        let map = hills(16, 12);
        let params = short_params(60);
        let a = compute_averages(&map, 77, &params).unwrap();
        let b = compute_averages(&map, 77, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_years_extend_schedule() {
        let map = hills(6, 6);
        let mut params = short_params(10);
        params.simulation.years = 3;
        let averages = compute_averages(&map, 1, &params).unwrap();
        assert_eq!(averages.days, 30);
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let map = Tilemap::new_with(2, 2, 0.0f32);
        assert!(compute_averages(&map, 1, &ClimateParams::default()).is_err());
    }

    #[test]
    fn test_calm_sea_level_never_rains() {
        let map = Tilemap::new_with(8, 8, 200.0f32);
        let params = ClimateParams::default();
        let mut state = ClimateState::new(&map, 9, 0, &params).unwrap();
        let mut averages = ClimateAverages::new(8, 8);
        for day in 0..params.simulation.total_days() {
            state.advance_with_wind(day, WindVector::CALM);
            averages.record(&state);
        }

        assert!(averages.avg_rain.as_slice().iter().all(|&r| r == 0.0));
        // Interior humidity climbs from 0.4 and settles near 0.52 under cloud;
        // the border ring stays at its seed values, so both ends of the band matter.
        let (t_lo, t_hi) = averages.avg_temp.min_max().unwrap();
        assert!(t_lo >= 0.69 && t_hi <= 0.72, "temperature {t_lo}..{t_hi}");
        let (h_lo, h_hi) = averages.avg_humidity.min_max().unwrap();
        assert!(h_lo >= 0.39 && h_hi <= 0.6, "humidity {h_lo}..{h_hi}");
        assert!(averages.avg_wind.as_slice().iter().all(|&w| w == 5.0));
    }
}
