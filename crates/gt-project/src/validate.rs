//! Site configuration validation.

use crate::schema::{
    BottomBoundaryDef, MeshDef, SiteConfig, SoilDef, SolverDef, SurfaceBoundaryDef, WeatherDef,
};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

fn fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, "must be within [0, 1]"))
    }
}

pub fn validate_config(config: &SiteConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }
    if config.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }
    if !(1..=60).contains(&config.timesteps_per_hour) {
        return Err(invalid(
            "timesteps_per_hour",
            config.timesteps_per_hour,
            "must be within 1..=60",
        ));
    }

    validate_soil(&config.soil)?;
    validate_weather(&config.weather)?;
    if let Some(mesh) = &config.mesh {
        validate_mesh(mesh)?;
    }
    if let Some(solver) = &config.solver {
        validate_solver(solver)?;
    }

    if let SurfaceBoundaryDef::FixedTemperature { temperature_c } = config.boundaries.surface {
        finite("boundaries.surface.temperature_c", temperature_c)?;
    }
    match config.boundaries.bottom {
        BottomBoundaryDef::GeothermalFlux { gradient_k_per_m } => {
            finite("boundaries.bottom.gradient_k_per_m", gradient_k_per_m)?;
        }
        BottomBoundaryDef::FixedTemperature { temperature_c } => {
            finite("boundaries.bottom.temperature_c", temperature_c)?;
        }
        BottomBoundaryDef::Adiabatic => {}
    }

    Ok(())
}

fn validate_soil(soil: &SoilDef) -> Result<(), ValidationError> {
    positive("soil.conductivity_w_per_m_k", soil.conductivity_w_per_m_k)?;
    positive("soil.density_kg_per_m3", soil.density_kg_per_m3)?;
    positive("soil.specific_heat_j_per_kg_k", soil.specific_heat_j_per_kg_k)?;
    finite("soil.evapotranspiration_coeff", soil.evapotranspiration_coeff)?;
    if !(0.0..100.0).contains(&soil.saturated_moisture_content_pct) {
        return Err(invalid(
            "soil.saturated_moisture_content_pct",
            soil.saturated_moisture_content_pct,
            "must be within [0, 100)",
        ));
    }
    if !(0.0..=soil.saturated_moisture_content_pct).contains(&soil.moisture_content_pct) {
        return Err(invalid(
            "soil.moisture_content_pct",
            soil.moisture_content_pct,
            "must be non-negative and not above saturation",
        ));
    }
    Ok(())
}

fn validate_weather(weather: &WeatherDef) -> Result<(), ValidationError> {
    match weather {
        WeatherDef::Epw { path } => {
            if path.as_os_str().is_empty() {
                return Err(invalid("weather.path", "", "must not be empty"));
            }
        }
        WeatherDef::Constant {
            dry_bulb_c,
            relative_humidity,
            wind_speed_m_per_s,
            horizontal_solar_w_per_m2,
            air_density_kg_per_m3,
            ..
        } => {
            finite("weather.dry_bulb_c", *dry_bulb_c)?;
            fraction("weather.relative_humidity", *relative_humidity)?;
            non_negative("weather.wind_speed_m_per_s", *wind_speed_m_per_s)?;
            non_negative(
                "weather.horizontal_solar_w_per_m2",
                *horizontal_solar_w_per_m2,
            )?;
            positive("weather.air_density_kg_per_m3", *air_density_kg_per_m3)?;
        }
        WeatherDef::Synthetic(def) => {
            finite("weather.mean_dry_bulb_c", def.mean_dry_bulb_c)?;
            finite("weather.amplitude_c", def.amplitude_c)?;
            finite("weather.diurnal_amplitude_c", def.diurnal_amplitude_c)?;
            fraction("weather.relative_humidity", def.relative_humidity)?;
            fraction("weather.diffuse_fraction", def.diffuse_fraction)?;
            non_negative("weather.wind_speed_m_per_s", def.wind_speed_m_per_s)?;
            non_negative(
                "weather.peak_beam_normal_w_per_m2",
                def.peak_beam_normal_w_per_m2,
            )?;
            let days = gt_core::days_in_year(def.leap_year);
            if !(1..=days).contains(&def.coldest_day) {
                return Err(invalid(
                    "weather.coldest_day",
                    def.coldest_day,
                    "must fall within the year",
                ));
            }
            if !(-90.0..=90.0).contains(&def.latitude_deg) {
                return Err(invalid(
                    "weather.latitude_deg",
                    def.latitude_deg,
                    "must be within [-90, 90]",
                ));
            }
        }
    }
    Ok(())
}

fn validate_mesh(mesh: &MeshDef) -> Result<(), ValidationError> {
    positive("mesh.surface_layer_thickness_m", mesh.surface_layer_thickness_m)?;
    positive("mesh.surface_cell_thickness_m", mesh.surface_cell_thickness_m)?;
    positive("mesh.center_expansion_ratio", mesh.center_expansion_ratio)?;
    positive("mesh.deep_layer_thickness_m", mesh.deep_layer_thickness_m)?;
    positive("mesh.deep_cell_thickness_m", mesh.deep_cell_thickness_m)?;
    if mesh.center_cell_count % 2 != 0 {
        return Err(invalid(
            "mesh.center_cell_count",
            mesh.center_cell_count,
            "must be even",
        ));
    }
    if mesh.surface_cell_thickness_m > mesh.surface_layer_thickness_m {
        return Err(invalid(
            "mesh.surface_cell_thickness_m",
            mesh.surface_cell_thickness_m,
            "must fit within the surface layer",
        ));
    }
    if mesh.deep_cell_thickness_m > mesh.deep_layer_thickness_m {
        return Err(invalid(
            "mesh.deep_cell_thickness_m",
            mesh.deep_cell_thickness_m,
            "must fit within the deep layer",
        ));
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    positive("solver.inner_tolerance_c", solver.inner_tolerance_c)?;
    positive("solver.outer_tolerance_c", solver.outer_tolerance_c)?;
    if solver.max_inner_iterations == 0 {
        return Err(invalid("solver.max_inner_iterations", 0, "must be at least 1"));
    }
    if solver.max_years == 0 {
        return Err(invalid("solver.max_years", 0, "must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BoundariesDef;

    fn config() -> SiteConfig {
        SiteConfig {
            version: 1,
            name: "site".to_string(),
            soil: SoilDef::default(),
            weather: WeatherDef::Synthetic(Default::default()),
            timesteps_per_hour: 1,
            mesh: None,
            solver: None,
            boundaries: BoundariesDef::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&config()).unwrap();
    }

    #[test]
    fn moisture_above_saturation_is_rejected() {
        let mut c = config();
        c.soil.moisture_content_pct = 60.0;
        let err = validate_config(&c).unwrap_err();
        assert!(err.to_string().contains("moisture_content_pct"));
    }

    #[test]
    fn odd_center_count_is_rejected() {
        let mut c = config();
        c.mesh = Some(MeshDef {
            surface_layer_thickness_m: 1.0,
            surface_cell_thickness_m: 0.1,
            center_cell_count: 7,
            center_expansion_ratio: 1.2,
            deep_layer_thickness_m: 0.2,
            deep_cell_thickness_m: 0.1,
        });
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn zero_caps_are_rejected() {
        let mut c = config();
        c.solver = Some(SolverDef {
            inner_tolerance_c: 1e-5,
            max_inner_iterations: 10,
            outer_tolerance_c: 0.05,
            max_years: 0,
        });
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn future_version_is_rejected() {
        let mut c = config();
        c.version = 7;
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::UnsupportedVersion { version: 7 })
        ));
    }

    #[test]
    fn humidity_percent_is_not_a_fraction() {
        let mut c = config();
        c.weather = WeatherDef::Constant {
            dry_bulb_c: 10.0,
            relative_humidity: 65.0,
            wind_speed_m_per_s: 2.0,
            horizontal_solar_w_per_m2: 0.0,
            air_density_kg_per_m3: 1.2,
            leap_year: false,
        };
        assert!(validate_config(&c).is_err());
    }
}
