//! Closed-form seasonal ground temperature used to seed the column, and the
//! query trait shared by every ground temperature model.

use crate::error::{ModelError, ModelResult};
use gt_core::{MONTHS_IN_YEAR, SECS_IN_DAY, ensure_finite, ensure_positive};
use gt_weather::AnnualWeather;
use std::f64::consts::PI;

/// Ground temperature lookup by depth and time of year.
pub trait GroundTemperatureModel {
    /// Temperature (°C) at `depth_m` below grade, `seconds` after the start of
    /// the year.
    fn temperature_at_seconds(&mut self, depth_m: f64, seconds: f64) -> ModelResult<f64>;

    /// Temperature (°C) at `depth_m` in the middle of a 1-based month.
    ///
    /// Months outside `1..=12` wrap onto the same annual cycle.
    fn temperature_at_month(&mut self, depth_m: f64, month: u32) -> ModelResult<f64>;
}

/// Kusuda-Achenbach periodic conduction model.
///
/// Surface temperature swings as a cosine around `mean_c`; the swing decays
/// and lags with depth according to the soil diffusivity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KusudaAchenbach {
    /// Annual mean surface temperature (°C)
    pub mean_c: f64,
    /// Amplitude of the surface swing (°C)
    pub amplitude_c: f64,
    /// Time of the coldest surface temperature (s from start of year)
    pub phase_shift_s: f64,
    /// Soil thermal diffusivity (m²/s)
    pub diffusivity: f64,
    /// Length of the periodic year (days)
    pub days_in_year: usize,
}

impl KusudaAchenbach {
    pub fn new(
        mean_c: f64,
        amplitude_c: f64,
        phase_shift_s: f64,
        diffusivity: f64,
        days_in_year: usize,
    ) -> ModelResult<Self> {
        ensure_finite(mean_c, "Kusuda-Achenbach mean")?;
        ensure_finite(amplitude_c, "Kusuda-Achenbach amplitude")?;
        ensure_finite(phase_shift_s, "Kusuda-Achenbach phase shift")?;
        ensure_positive(diffusivity, "soil diffusivity")?;
        if days_in_year == 0 {
            return Err(ModelError::InvalidArg {
                what: "days_in_year must be positive",
            });
        }
        Ok(Self {
            mean_c,
            amplitude_c,
            phase_shift_s,
            diffusivity,
            days_in_year,
        })
    }

    /// Parameters from aggregated weather: the annual mean, a quarter of the
    /// spread between the extreme daily means, and the coldest day as phase.
    pub fn from_weather(weather: &AnnualWeather, diffusivity: f64) -> ModelResult<Self> {
        Self::new(
            weather.annual_mean_dry_bulb_c(),
            (weather.max_daily_dry_bulb_c() - weather.min_daily_dry_bulb_c()) / 4.0,
            weather.day_of_min() as f64 * SECS_IN_DAY,
            diffusivity,
            weather.days_in_year(),
        )
    }

    fn seconds_in_year(&self) -> f64 {
        SECS_IN_DAY * self.days_in_year as f64
    }

    pub fn temperature(&self, depth_m: f64, seconds: f64) -> f64 {
        let period = self.seconds_in_year();
        let damping = -depth_m * (PI / (period * self.diffusivity)).sqrt();
        let lag = depth_m / 2.0 * (period / (PI * self.diffusivity)).sqrt();
        let angle = 2.0 * PI / period * (seconds - self.phase_shift_s - lag);
        self.mean_c - self.amplitude_c * damping.exp() * angle.cos()
    }
}

impl GroundTemperatureModel for KusudaAchenbach {
    fn temperature_at_seconds(&mut self, depth_m: f64, seconds: f64) -> ModelResult<f64> {
        Ok(self.temperature(depth_m, seconds))
    }

    fn temperature_at_month(&mut self, depth_m: f64, month: u32) -> ModelResult<f64> {
        let month_secs = self.seconds_in_year() / MONTHS_IN_YEAR as f64;
        let seconds = month_secs * (f64::from(month) - 0.5);
        Ok(self.temperature(depth_m, seconds))
    }
}
