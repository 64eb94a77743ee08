//! Weather source that repeats one sample for every timestep of the year.

use crate::error::{WeatherError, WeatherResult};
use crate::source::{FullYearRequest, SampleStamp, WeatherSample, WeatherSource, for_each_stamp};

/// Steady weather, mostly useful for isothermal checks.
#[derive(Clone, Debug)]
pub struct ConstantWeather {
    pub name: String,
    pub sample: WeatherSample,
    pub leap_year: bool,
}

impl ConstantWeather {
    pub fn new(name: impl Into<String>, sample: WeatherSample) -> WeatherResult<Self> {
        let finite = [
            sample.dry_bulb_c,
            sample.relative_humidity,
            sample.wind_speed_m_per_s,
            sample.horizontal_solar_w_per_m2,
            sample.air_density_kg_per_m3,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(WeatherError::InvalidArg {
                what: "constant weather values must be finite",
            });
        }
        if sample.air_density_kg_per_m3 <= 0.0 {
            return Err(WeatherError::InvalidArg {
                what: "air density must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            sample,
            leap_year: false,
        })
    }

    pub fn with_leap_year(mut self, leap_year: bool) -> Self {
        self.leap_year = leap_year;
        self
    }
}

impl WeatherSource for ConstantWeather {
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
        let sample = self.sample;
        for_each_stamp(self.days_in_year(), request, |stamp| on_sample(stamp, &sample));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeatherAggregator;

    fn sample() -> WeatherSample {
        WeatherSample {
            dry_bulb_c: 15.0,
            relative_humidity: 0.0,
            wind_speed_m_per_s: 0.0,
            horizontal_solar_w_per_m2: 0.0,
            air_density_kg_per_m3: 1.2,
        }
    }

    #[test]
    fn constant_year_averages_to_itself() {
        let mut source = ConstantWeather::new("steady", sample()).unwrap();
        let annual = WeatherAggregator::default().aggregate(&mut source).unwrap();
        assert_eq!(annual.days_in_year(), 365);
        assert_eq!(annual.annual_mean_dry_bulb_c(), 15.0);
        assert_eq!(annual.day_of_min(), 1);
        assert_eq!(annual.day_of_max(), 1);
    }

    #[test]
    fn leap_year_has_366_days() {
        let mut source = ConstantWeather::new("steady", sample())
            .unwrap()
            .with_leap_year(true);
        let annual = WeatherAggregator::new(FullYearRequest {
            timesteps_per_hour: 6,
        })
        .aggregate(&mut source)
        .unwrap();
        assert_eq!(annual.days_in_year(), 366);
    }

    #[test]
    fn rejects_non_positive_density() {
        let mut s = sample();
        s.air_density_kg_per_m3 = 0.0;
        assert!(ConstantWeather::new("bad", s).is_err());
    }
}
