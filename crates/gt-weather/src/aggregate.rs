//! Reduction of one replayed year into daily averaged weather.

use crate::error::{WeatherError, WeatherResult};
use crate::source::{FullYearRequest, SampleStamp, WeatherSample, WeatherSource};
use tracing::info;

/// Daily-mean weather driving one simulated day of the ground model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DailyWeatherRecord {
    /// Mean dry-bulb temperature (°C)
    pub dry_bulb_c: f64,
    /// Mean relative humidity as a fraction
    pub relative_humidity: f64,
    /// Mean wind speed (m/s)
    pub wind_speed_m_per_s: f64,
    /// Mean horizontal beam + diffuse irradiance (W/m²)
    pub horizontal_solar_w_per_m2: f64,
    /// Mean air density (kg/m³)
    pub air_density_kg_per_m3: f64,
}

/// One synthetic year of daily weather plus the statistics used to seed the
/// ground model.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnualWeather {
    days: Vec<DailyWeatherRecord>,
    annual_mean_dry_bulb_c: f64,
    min_daily_dry_bulb_c: f64,
    max_daily_dry_bulb_c: f64,
    day_of_min: usize,
    day_of_max: usize,
}

impl AnnualWeather {
    /// Build from one record per day (365 or 366 records).
    pub fn from_daily(days: Vec<DailyWeatherRecord>) -> WeatherResult<Self> {
        if days.len() != gt_core::DAYS_IN_COMMON_YEAR && days.len() != gt_core::DAYS_IN_LEAP_YEAR {
            return Err(WeatherError::Incomplete {
                expected: "365 or 366 daily records".to_string(),
                found: days.len().to_string(),
            });
        }

        let mut sum = 0.0;
        let mut min = (f64::INFINITY, 1);
        let mut max = (f64::NEG_INFINITY, 1);
        for (i, day) in days.iter().enumerate() {
            if !day.dry_bulb_c.is_finite() {
                return Err(WeatherError::InvalidArg {
                    what: "daily dry-bulb temperature must be finite",
                });
            }
            sum += day.dry_bulb_c;
            // first occurrence wins on ties
            if day.dry_bulb_c < min.0 {
                min = (day.dry_bulb_c, i + 1);
            }
            if day.dry_bulb_c > max.0 {
                max = (day.dry_bulb_c, i + 1);
            }
        }

        Ok(Self {
            annual_mean_dry_bulb_c: sum / days.len() as f64,
            min_daily_dry_bulb_c: min.0,
            max_daily_dry_bulb_c: max.0,
            day_of_min: min.1,
            day_of_max: max.1,
            days,
        })
    }

    pub fn days(&self) -> &[DailyWeatherRecord] {
        &self.days
    }

    /// Record for a 1-based day of year.
    pub fn day(&self, day_of_year: usize) -> Option<&DailyWeatherRecord> {
        day_of_year
            .checked_sub(1)
            .and_then(|index| self.days.get(index))
    }

    pub fn days_in_year(&self) -> usize {
        self.days.len()
    }

    pub fn annual_mean_dry_bulb_c(&self) -> f64 {
        self.annual_mean_dry_bulb_c
    }

    pub fn min_daily_dry_bulb_c(&self) -> f64 {
        self.min_daily_dry_bulb_c
    }

    pub fn max_daily_dry_bulb_c(&self) -> f64 {
        self.max_daily_dry_bulb_c
    }

    /// 1-based day of the coldest daily mean.
    pub fn day_of_min(&self) -> usize {
        self.day_of_min
    }

    /// 1-based day of the warmest daily mean.
    pub fn day_of_max(&self) -> usize {
        self.day_of_max
    }
}

#[derive(Default)]
struct DayAccumulator {
    dry_bulb: f64,
    relative_humidity: f64,
    wind_speed: f64,
    horizontal_solar: f64,
    air_density: f64,
    count: usize,
}

impl DayAccumulator {
    fn add(&mut self, sample: &WeatherSample) {
        self.dry_bulb += sample.dry_bulb_c;
        self.relative_humidity += sample.relative_humidity;
        self.wind_speed += sample.wind_speed_m_per_s;
        self.horizontal_solar += sample.horizontal_solar_w_per_m2;
        self.air_density += sample.air_density_kg_per_m3;
        self.count += 1;
    }

    fn finish(self) -> DailyWeatherRecord {
        let n = self.count as f64;
        DailyWeatherRecord {
            dry_bulb_c: self.dry_bulb / n,
            relative_humidity: self.relative_humidity / n,
            wind_speed_m_per_s: self.wind_speed / n,
            horizontal_solar_w_per_m2: self.horizontal_solar / n,
            air_density_kg_per_m3: self.air_density / n,
        }
    }
}

/// Drives a weather source through one full year and averages each day.
#[derive(Clone, Debug, Default)]
pub struct WeatherAggregator {
    pub request: FullYearRequest,
}

impl WeatherAggregator {
    pub fn new(request: FullYearRequest) -> Self {
        Self { request }
    }

    pub fn aggregate(&self, source: &mut dyn WeatherSource) -> WeatherResult<AnnualWeather> {
        if self.request.timesteps_per_hour == 0 {
            return Err(WeatherError::InvalidArg {
                what: "timesteps_per_hour must be positive",
            });
        }

        let days_in_year = source.days_in_year();
        let samples_per_day = self.request.samples_per_day();

        let mut days: Vec<DailyWeatherRecord> = Vec::with_capacity(days_in_year);
        let mut current = DayAccumulator::default();
        let mut current_day = 1;
        let mut out_of_order: Option<SampleStamp> = None;

        source.simulate_full_year(&self.request, &mut |stamp, sample| {
            if out_of_order.is_some() {
                return;
            }
            if stamp.day == current_day + 1 && current.count == samples_per_day {
                days.push(std::mem::take(&mut current).finish());
                current_day = stamp.day;
            }
            if stamp.day != current_day || current.count >= samples_per_day {
                out_of_order = Some(stamp);
                return;
            }
            current.add(sample);
        })?;

        if let Some(stamp) = out_of_order {
            return Err(WeatherError::Incomplete {
                expected: format!("{samples_per_day} samples for day {current_day}"),
                found: format!("sample stamped {stamp:?}"),
            });
        }
        if current.count == samples_per_day {
            days.push(current.finish());
        }
        if days.len() != days_in_year {
            return Err(WeatherError::Incomplete {
                expected: format!("{days_in_year} complete days from {}", source.name()),
                found: days.len().to_string(),
            });
        }

        let annual = AnnualWeather::from_daily(days)?;
        info!(
            source = source.name(),
            days = annual.days_in_year(),
            mean_c = annual.annual_mean_dry_bulb_c(),
            min_c = annual.min_daily_dry_bulb_c(),
            day_of_min = annual.day_of_min(),
            max_c = annual.max_daily_dry_bulb_c(),
            day_of_max = annual.day_of_max(),
            "aggregated daily weather"
        );
        Ok(annual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dry_bulb_c: f64) -> DailyWeatherRecord {
        DailyWeatherRecord {
            dry_bulb_c,
            relative_humidity: 0.5,
            wind_speed_m_per_s: 2.0,
            horizontal_solar_w_per_m2: 150.0,
            air_density_kg_per_m3: 1.2,
        }
    }

    #[test]
    fn statistics_track_extremes() {
        let mut days: Vec<_> = (0..365).map(|_| record(10.0)).collect();
        days[20] = record(-5.0);
        days[200] = record(30.0);
        // later tie must not move the recorded day
        days[300] = record(-5.0);
        let annual = AnnualWeather::from_daily(days).unwrap();
        assert_eq!(annual.day_of_min(), 21);
        assert_eq!(annual.day_of_max(), 201);
        assert_eq!(annual.min_daily_dry_bulb_c(), -5.0);
        assert_eq!(annual.max_daily_dry_bulb_c(), 30.0);
        let expected_mean = (362.0 * 10.0 - 10.0 + 30.0) / 365.0;
        assert!((annual.annual_mean_dry_bulb_c() - expected_mean).abs() < 1e-12);
    }

    #[test]
    fn wrong_day_count_is_rejected() {
        let days: Vec<_> = (0..100).map(|_| record(10.0)).collect();
        assert!(matches!(
            AnnualWeather::from_daily(days),
            Err(WeatherError::Incomplete { .. })
        ));
    }

    #[test]
    fn day_lookup_is_one_based() {
        let mut days: Vec<_> = (0..366).map(|_| record(1.0)).collect();
        days[0] = record(-1.0);
        let annual = AnnualWeather::from_daily(days).unwrap();
        assert_eq!(annual.day(1).unwrap().dry_bulb_c, -1.0);
        assert!(annual.day(0).is_none());
        assert!(annual.day(367).is_none());
        assert_eq!(annual.days_in_year(), 366);
    }

    struct ShortSource;

    impl WeatherSource for ShortSource {
        fn name(&self) -> &str {
            "short"
        }

        fn days_in_year(&self) -> usize {
            365
        }

        fn simulate_full_year(
            &mut self,
            _request: &FullYearRequest,
            on_sample: &mut dyn FnMut(SampleStamp, &WeatherSample),
        ) -> WeatherResult<()> {
            let sample = WeatherSample {
                dry_bulb_c: 5.0,
                relative_humidity: 0.5,
                wind_speed_m_per_s: 1.0,
                horizontal_solar_w_per_m2: 0.0,
                air_density_kg_per_m3: 1.2,
            };
            for hour in 1..=24 {
                on_sample(
                    SampleStamp {
                        day: 1,
                        hour,
                        timestep: 1,
                    },
                    &sample,
                );
            }
            Ok(())
        }
    }

    #[test]
    fn truncated_year_is_incomplete() {
        let aggregator = WeatherAggregator::default();
        let err = aggregator.aggregate(&mut ShortSource).unwrap_err();
        assert!(matches!(err, WeatherError::Incomplete { .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mean_lies_between_extremes(temps in prop::collection::vec(-30.0_f64..40.0, 365)) {
            let days = temps
                .iter()
                .map(|&t| DailyWeatherRecord { dry_bulb_c: t, ..DailyWeatherRecord::default() })
                .collect();
            let annual = AnnualWeather::from_daily(days).unwrap();
            prop_assert!(annual.min_daily_dry_bulb_c() <= annual.annual_mean_dry_bulb_c() + 1e-9);
            prop_assert!(annual.annual_mean_dry_bulb_c() <= annual.max_daily_dry_bulb_c() + 1e-9);
            prop_assert_eq!(temps[annual.day_of_min() - 1], annual.min_daily_dry_bulb_c());
            prop_assert_eq!(temps[annual.day_of_max() - 1], annual.max_daily_dry_bulb_c());
        }
    }
}
