//! Parametric weather year: seasonal and diurnal cosine temperature swings and
//! a clear-sky solar estimate.

use crate::error::{WeatherError, WeatherResult};
use crate::psychro::{STANDARD_PRESSURE_PA, air_density, humidity_ratio_from_relative_humidity};
use crate::source::{FullYearRequest, SampleStamp, WeatherSample, WeatherSource, for_each_stamp};
use std::f64::consts::PI;

/// Hour of the day with the warmest air temperature.
const WARMEST_HOUR: f64 = 15.0;

/// Parameters of a synthetic weather year.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticWeather {
    pub name: String,
    /// Annual mean dry-bulb (°C)
    pub mean_dry_bulb_c: f64,
    /// Half of the seasonal swing of daily means (°C)
    pub seasonal_amplitude_c: f64,
    /// 1-based day of the coldest daily mean
    pub coldest_day: usize,
    /// Half of the day/night swing (°C)
    pub diurnal_amplitude_c: f64,
    /// Relative humidity as a fraction
    pub relative_humidity: f64,
    /// Wind speed (m/s)
    pub wind_speed_m_per_s: f64,
    /// Site latitude (degrees, north positive)
    pub latitude_deg: f64,
    /// Beam-normal irradiance with the sun overhead (W/m²)
    pub peak_beam_normal_w_per_m2: f64,
    /// Diffuse share relative to the beam on a horizontal surface
    pub diffuse_fraction: f64,
    pub leap_year: bool,
}

impl Default for SyntheticWeather {
    fn default() -> Self {
        Self {
            name: "synthetic".to_string(),
            mean_dry_bulb_c: 10.0,
            seasonal_amplitude_c: 12.0,
            coldest_day: 20,
            diurnal_amplitude_c: 5.0,
            relative_humidity: 0.65,
            wind_speed_m_per_s: 3.0,
            latitude_deg: 40.0,
            peak_beam_normal_w_per_m2: 850.0,
            diffuse_fraction: 0.15,
            leap_year: false,
        }
    }
}

impl SyntheticWeather {
    pub fn validate(&self) -> WeatherResult<()> {
        if !(1..=gt_core::days_in_year(self.leap_year)).contains(&self.coldest_day) {
            return Err(WeatherError::InvalidArg {
                what: "coldest_day must fall within the year",
            });
        }
        if !(0.0..=1.0).contains(&self.relative_humidity) {
            return Err(WeatherError::InvalidArg {
                what: "relative_humidity must be a fraction",
            });
        }
        if self.wind_speed_m_per_s < 0.0 || self.peak_beam_normal_w_per_m2 < 0.0 {
            return Err(WeatherError::InvalidArg {
                what: "wind speed and irradiance must be non-negative",
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(WeatherError::InvalidArg {
                what: "latitude must be within [-90, 90]",
            });
        }
        Ok(())
    }

    /// Dry-bulb temperature on a 1-based day at a fractional hour of the day.
    pub fn dry_bulb_at(&self, day: usize, hour_of_day: f64) -> f64 {
        let days = gt_core::days_in_year(self.leap_year) as f64;
        let seasonal = 2.0 * PI * (day as f64 - self.coldest_day as f64) / days;
        let diurnal = 2.0 * PI * (hour_of_day - WARMEST_HOUR) / 24.0;
        self.mean_dry_bulb_c - self.seasonal_amplitude_c * seasonal.cos()
            + self.diurnal_amplitude_c * diurnal.cos()
    }

    /// Cosine of the solar zenith angle for a day and local solar hour.
    pub fn cos_zenith(&self, day: usize, hour_of_day: f64) -> f64 {
        let days = gt_core::days_in_year(self.leap_year) as f64;
        let latitude = self.latitude_deg.to_radians();
        let declination =
            23.45_f64.to_radians() * (2.0 * PI * (284.0 + day as f64) / days).sin();
        let hour_angle = (hour_of_day - 12.0) / 24.0 * 2.0 * PI;
        latitude.sin() * declination.sin()
            + latitude.cos() * declination.cos() * hour_angle.cos()
    }

    fn sample_at(&self, stamp: SampleStamp, request: &FullYearRequest) -> WeatherSample {
        // midpoint of the timestep
        let hour_of_day = (stamp.hour - 1) as f64
            + (stamp.timestep as f64 - 0.5) / request.timesteps_per_hour as f64;
        let dry_bulb_c = self.dry_bulb_at(stamp.day, hour_of_day);
        let cos_zenith = self.cos_zenith(stamp.day, hour_of_day);
        let beam = self.peak_beam_normal_w_per_m2;
        let diffuse = if cos_zenith > 0.0 {
            self.diffuse_fraction * beam * cos_zenith
        } else {
            0.0
        };
        let w = humidity_ratio_from_relative_humidity(
            dry_bulb_c,
            self.relative_humidity,
            STANDARD_PRESSURE_PA,
        );

        WeatherSample {
            dry_bulb_c,
            relative_humidity: self.relative_humidity,
            wind_speed_m_per_s: self.wind_speed_m_per_s,
            horizontal_solar_w_per_m2: WeatherSample::horizontal_from_components(
                beam, diffuse, cos_zenith,
            ),
            air_density_kg_per_m3: air_density(STANDARD_PRESSURE_PA, dry_bulb_c, w),
        }
    }
}

impl WeatherSource for SyntheticWeather {
    fn name(&self) -> &str {
        &self.name
    }

    fn days_in_year(&self) -> usize {
        gt_core::days_in_year(self.leap_year)
    }

    fn simulate_full_year(
        &mut self,
        request: &FullYearRequest,
        on_sample: &mut dyn FnMut(SampleStamp, &WeatherSample),
    ) -> WeatherResult<()> {
        self.validate()?;
        for_each_stamp(self.days_in_year(), request, |stamp| {
            let sample = self.sample_at(stamp, request);
            on_sample(stamp, &sample);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeatherAggregator;

    #[test]
    fn coldest_day_is_recovered_by_aggregation() {
        let mut source = SyntheticWeather {
            coldest_day: 30,
            ..SyntheticWeather::default()
        };
        let annual = WeatherAggregator::default().aggregate(&mut source).unwrap();
        assert!((annual.day_of_min() as i64 - 30).abs() <= 1);
        assert!((annual.annual_mean_dry_bulb_c() - 10.0).abs() < 0.05);
        let swing = annual.max_daily_dry_bulb_c() - annual.min_daily_dry_bulb_c();
        assert!((swing - 24.0).abs() < 0.1, "swing = {swing}");
    }

    #[test]
    fn summer_has_more_sun_than_winter_in_the_north() {
        let mut source = SyntheticWeather::default();
        let annual = WeatherAggregator::default().aggregate(&mut source).unwrap();
        let january = annual.day(15).unwrap().horizontal_solar_w_per_m2;
        let july = annual.day(196).unwrap().horizontal_solar_w_per_m2;
        assert!(july > january);
        assert!(january >= 0.0);
    }

    #[test]
    fn invalid_coldest_day_is_rejected() {
        let mut source = SyntheticWeather {
            coldest_day: 400,
            ..SyntheticWeather::default()
        };
        assert!(WeatherAggregator::default().aggregate(&mut source).is_err());
    }
}
