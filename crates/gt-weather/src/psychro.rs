//! Moist-air helpers used to fill in samples that lack a measured density.

use gt_core::constants::KELVIN_OFFSET;

pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

const R_DRY_AIR: f64 = 287.042; // J/kg-K
const MOLAR_MASS_RATIO: f64 = 0.621_945;

/// Saturation vapor pressure over water (Pa), Magnus/Tetens form.
pub fn saturation_pressure_pa(t_c: f64) -> f64 {
    610.78 * (17.27 * t_c / (t_c + 237.3)).exp()
}

/// Humidity ratio (kg water / kg dry air) from dew point and barometric pressure.
pub fn humidity_ratio_from_dew_point(dew_point_c: f64, pressure_pa: f64) -> f64 {
    let pw = saturation_pressure_pa(dew_point_c);
    (MOLAR_MASS_RATIO * pw / (pressure_pa - pw)).max(0.0)
}

/// Humidity ratio from relative humidity (fraction).
pub fn humidity_ratio_from_relative_humidity(t_c: f64, rh: f64, pressure_pa: f64) -> f64 {
    let pw = rh.clamp(0.0, 1.0) * saturation_pressure_pa(t_c);
    (MOLAR_MASS_RATIO * pw / (pressure_pa - pw)).max(0.0)
}

/// Moist air density (kg/m³).
pub fn air_density(pressure_pa: f64, t_c: f64, humidity_ratio: f64) -> f64 {
    pressure_pa / (R_DRY_AIR * (t_c + KELVIN_OFFSET) * (1.0 + 1.607_768_7 * humidity_ratio))
}

/// Relative humidity (fraction) implied by a dew point.
pub fn relative_humidity_from_dew_point(t_c: f64, dew_point_c: f64) -> f64 {
    (saturation_pressure_pa(dew_point_c) / saturation_pressure_pa(t_c)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_pressure_at_20c() {
        // ~2.34 kPa
        let p = saturation_pressure_pa(20.0);
        assert!((p - 2338.0).abs() < 15.0, "p = {p}");
    }

    #[test]
    fn dry_air_density_at_standard_conditions() {
        let rho = air_density(STANDARD_PRESSURE_PA, 15.0, 0.0);
        assert!((rho - 1.225).abs() < 0.002, "rho = {rho}");
    }

    #[test]
    fn humid_air_is_lighter() {
        let w = humidity_ratio_from_relative_humidity(25.0, 0.8, STANDARD_PRESSURE_PA);
        assert!(w > 0.0);
        assert!(air_density(STANDARD_PRESSURE_PA, 25.0, w) < air_density(STANDARD_PRESSURE_PA, 25.0, 0.0));
    }

    #[test]
    fn dew_point_equal_to_dry_bulb_is_saturated() {
        assert!((relative_humidity_from_dew_point(12.0, 12.0) - 1.0).abs() < 1e-12);
    }
}
