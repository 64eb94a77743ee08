//! Weather source trait and the sample type it produces.

use crate::error::WeatherResult;

/// One weather sample at the resolution of the source's timestep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherSample {
    /// Outdoor dry-bulb temperature (°C)
    pub dry_bulb_c: f64,
    /// Relative humidity as a fraction (0..=1)
    pub relative_humidity: f64,
    /// Wind speed (m/s)
    pub wind_speed_m_per_s: f64,
    /// Solar irradiance on a horizontal surface, beam + diffuse (W/m²)
    pub horizontal_solar_w_per_m2: f64,
    /// Outdoor air density (kg/m³)
    pub air_density_kg_per_m3: f64,
}

impl WeatherSample {
    /// Horizontal irradiance from beam-normal and diffuse components.
    ///
    /// The beam contributes only while the sun is above the horizon.
    pub fn horizontal_from_components(
        beam_normal_w_per_m2: f64,
        diffuse_horizontal_w_per_m2: f64,
        cos_zenith: f64,
    ) -> f64 {
        cos_zenith.max(0.0) * beam_normal_w_per_m2 + diffuse_horizontal_w_per_m2
    }
}

/// Position of a sample within the replayed year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleStamp {
    /// Day of year, 1-based
    pub day: usize,
    /// Hour of day, 1..=24 (hour ending)
    pub hour: usize,
    /// Timestep within the hour, 1..=timesteps_per_hour
    pub timestep: usize,
}

/// Request to replay exactly one full calendar year.
///
/// The source owns whatever run state it has (playback cursor, environment
/// selection) and must leave it as it found it once the replay returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullYearRequest {
    /// Samples emitted per hour
    pub timesteps_per_hour: usize,
}

impl Default for FullYearRequest {
    fn default() -> Self {
        Self {
            timesteps_per_hour: 1,
        }
    }
}

impl FullYearRequest {
    pub fn samples_per_day(&self) -> usize {
        self.timesteps_per_hour * gt_core::HOURS_IN_DAY
    }
}

/// A weather collaborator able to simulate one calendar year.
pub trait WeatherSource {
    /// Name for diagnostics.
    fn name(&self) -> &str;

    /// Length of the calendar year this source replays (365 or 366).
    fn days_in_year(&self) -> usize;

    /// Replay every timestep of one full year in order, handing each sample
    /// to `on_sample`.
    ///
    /// Implementations must restore any internal run state on every exit path.
    fn simulate_full_year(
        &mut self,
        request: &FullYearRequest,
        on_sample: &mut dyn FnMut(SampleStamp, &WeatherSample),
    ) -> WeatherResult<()>;
}

impl<W: WeatherSource + ?Sized> WeatherSource for Box<W> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn days_in_year(&self) -> usize {
        (**self).days_in_year()
    }

    fn simulate_full_year(
        &mut self,
        request: &FullYearRequest,
        on_sample: &mut dyn FnMut(SampleStamp, &WeatherSample),
    ) -> WeatherResult<()> {
        (**self).simulate_full_year(request, on_sample)
    }
}

/// Walk every (day, hour, timestep) stamp of a year in order.
pub(crate) fn for_each_stamp(
    days_in_year: usize,
    request: &FullYearRequest,
    mut f: impl FnMut(SampleStamp),
) {
    for day in 1..=days_in_year {
        for hour in 1..=gt_core::HOURS_IN_DAY {
            for timestep in 1..=request.timesteps_per_hour {
                f(SampleStamp {
                    day,
                    hour,
                    timestep,
                });
            }
        }
    }
}
