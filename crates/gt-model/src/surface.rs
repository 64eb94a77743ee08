//! Surface energy balance: net radiation less evapotranspiration.
//!
//! Fluxes are formed in MJ/m²·h, the units of the FAO Penman-Monteith
//! reference relations, and returned in W/m².

use gt_core::units::constants::KELVIN_OFFSET;
use gt_core::SECS_IN_HOUR;
use gt_weather::DailyWeatherRecord;

/// W/m² to MJ/m²·h.
const W_TO_MJ_PER_HOUR: f64 = SECS_IN_HOUR / 1.0e6;
const ALBEDO: f64 = 0.23;
const STEFAN_BOLTZMANN_MJ_PER_HOUR: f64 = 2.042e-10;
/// Psychrometric constant at 98 kPa (kPa/K).
const PSYCHROMETRIC_CONSTANT: f64 = 0.665e-3 * 98.0;
/// Reference crop numerator constant for hourly steps.
const CN_HOURLY: f64 = 37.0;
const WATER_DENSITY: f64 = 998.0;

/// Saturation vapour pressure over water (kPa).
pub fn saturation_vapor_pressure_kpa(t_c: f64) -> f64 {
    0.6108 * (17.27 * t_c / (t_c + 237.3)).exp()
}

/// Slope of the saturation vapour pressure curve (kPa/K).
pub fn saturation_slope_kpa_per_k(t_c: f64) -> f64 {
    2503.0 * (17.27 * t_c / (t_c + 237.3)).exp() / (t_c + 237.3).powi(2)
}

/// Terms of the surface balance for one day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceFluxes {
    /// Absorbed shortwave less net longwave (W/m²)
    pub net_radiation: f64,
    /// Latent heat carried off by evapotranspiration (W/m²)
    pub evapotranspiration: f64,
}

impl SurfaceFluxes {
    /// Net heat flux into the ground surface (W/m²).
    pub fn net_gain(&self) -> f64 {
        self.net_radiation - self.evapotranspiration
    }
}

/// Evaluate the balance from daily weather and yesterday's surface temperature.
pub fn surface_fluxes(
    weather: &DailyWeatherRecord,
    prev_surface_c: f64,
    evapotranspiration_coeff: f64,
) -> SurfaceFluxes {
    let t_air = weather.dry_bulb_c;
    let t_air_k = t_air + KELVIN_OFFSET;
    let wind = weather.wind_speed_m_per_s;

    let incident = weather.horizontal_solar_w_per_m2 * W_TO_MJ_PER_HOUR;
    let absorbed = (1.0 - ALBEDO) * incident;

    let vp_sat = saturation_vapor_pressure_kpa(t_air);
    let vp_actual = vp_sat * weather.relative_humidity;

    let longwave =
        STEFAN_BOLTZMANN_MJ_PER_HOUR * t_air_k.powi(4) * (0.34 - 0.14 * vp_actual.sqrt());
    let net_radiation = absorbed - longwave;

    // soil heat flux share and bulk surface resistance switch between night and day
    let (soil_flux, cd) = if net_radiation < 0.0 {
        (0.5 * net_radiation, 0.96)
    } else {
        (0.1 * net_radiation, 0.24)
    };

    let slope = saturation_slope_kpa_per_k(t_air);
    let et_mm_per_hour = (evapotranspiration_coeff * slope * (net_radiation - soil_flux)
        + PSYCHROMETRIC_CONSTANT * (CN_HOURLY / t_air_k) * wind * (vp_sat - vp_actual))
        / (slope + PSYCHROMETRIC_CONSTANT * (1.0 + cd * wind));
    let et_m_per_hour = et_mm_per_hour / 1000.0;

    let latent_heat = 2.501 - 2.361e-3 * prev_surface_c;
    let et_heat = WATER_DENSITY * et_m_per_hour * latent_heat;

    SurfaceFluxes {
        net_radiation: net_radiation / W_TO_MJ_PER_HOUR,
        evapotranspiration: et_heat / W_TO_MJ_PER_HOUR,
    }
}
