//! Conversion of a validated site configuration into model inputs.

use crate::ProjectResult;
use crate::schema::{
    BottomBoundaryDef, BoundariesDef, MeshDef, SiteConfig, SoilDef, SolverDef, SurfaceBoundaryDef,
    SyntheticDef, WeatherDef,
};
use gt_core::units::{j_per_kg_k, kg_per_m3, percent, w_per_m_k};
use gt_model::{
    BottomBoundary, BoundaryConditions, FiniteDifferenceModel, MeshConfig, SoilProperties,
    SolverConfig, SurfaceBoundary,
};
use gt_weather::{
    ConstantWeather, EpwWeather, FullYearRequest, SyntheticWeather, WeatherSample, WeatherSource,
};
use std::path::Path;

impl SoilDef {
    /// Soil properties with percentages converted to fractions.
    pub fn to_properties(&self) -> ProjectResult<SoilProperties> {
        Ok(SoilProperties::from_quantities(
            w_per_m_k(self.conductivity_w_per_m_k),
            kg_per_m3(self.density_kg_per_m3),
            j_per_kg_k(self.specific_heat_j_per_kg_k),
            percent(self.moisture_content_pct),
            percent(self.saturated_moisture_content_pct),
            self.evapotranspiration_coeff,
        )?)
    }
}

impl From<&MeshDef> for MeshConfig {
    fn from(def: &MeshDef) -> Self {
        Self {
            surface_layer_thickness: def.surface_layer_thickness_m,
            surface_cell_thickness: def.surface_cell_thickness_m,
            center_cell_count: def.center_cell_count,
            center_expansion_ratio: def.center_expansion_ratio,
            deep_layer_thickness: def.deep_layer_thickness_m,
            deep_cell_thickness: def.deep_cell_thickness_m,
        }
    }
}

impl From<&SolverDef> for SolverConfig {
    fn from(def: &SolverDef) -> Self {
        Self {
            inner_tolerance_c: def.inner_tolerance_c,
            max_inner_iterations: def.max_inner_iterations,
            outer_tolerance_c: def.outer_tolerance_c,
            max_years: def.max_years,
        }
    }
}

impl From<&BoundariesDef> for BoundaryConditions {
    fn from(def: &BoundariesDef) -> Self {
        let surface = match def.surface {
            SurfaceBoundaryDef::EnergyBalance => SurfaceBoundary::EnergyBalance,
            SurfaceBoundaryDef::ConvectionOnly => SurfaceBoundary::ConvectionOnly,
            SurfaceBoundaryDef::FixedTemperature { temperature_c } => {
                SurfaceBoundary::FixedTemperature(temperature_c)
            }
        };
        let bottom = match def.bottom {
            BottomBoundaryDef::GeothermalFlux { gradient_k_per_m } => {
                BottomBoundary::GeothermalFlux { gradient_k_per_m }
            }
            BottomBoundaryDef::Adiabatic => BottomBoundary::Adiabatic,
            BottomBoundaryDef::FixedTemperature { temperature_c } => {
                BottomBoundary::FixedTemperature(temperature_c)
            }
        };
        Self { surface, bottom }
    }
}

impl SyntheticDef {
    pub fn to_source(&self, name: &str) -> SyntheticWeather {
        SyntheticWeather {
            name: name.to_string(),
            mean_dry_bulb_c: self.mean_dry_bulb_c,
            seasonal_amplitude_c: self.amplitude_c,
            coldest_day: self.coldest_day,
            diurnal_amplitude_c: self.diurnal_amplitude_c,
            relative_humidity: self.relative_humidity,
            wind_speed_m_per_s: self.wind_speed_m_per_s,
            latitude_deg: self.latitude_deg,
            peak_beam_normal_w_per_m2: self.peak_beam_normal_w_per_m2,
            diffuse_fraction: self.diffuse_fraction,
            leap_year: self.leap_year,
        }
    }
}

impl SiteConfig {
    /// Weather source for this site. Relative EPW paths resolve against
    /// `base_dir` when given.
    pub fn weather_source(&self, base_dir: Option<&Path>) -> ProjectResult<Box<dyn WeatherSource>> {
        let source: Box<dyn WeatherSource> = match &self.weather {
            WeatherDef::Epw { path } => {
                let resolved = match base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                Box::new(EpwWeather::from_file(resolved)?)
            }
            WeatherDef::Constant {
                dry_bulb_c,
                relative_humidity,
                wind_speed_m_per_s,
                horizontal_solar_w_per_m2,
                air_density_kg_per_m3,
                leap_year,
            } => {
                let sample = WeatherSample {
                    dry_bulb_c: *dry_bulb_c,
                    relative_humidity: *relative_humidity,
                    wind_speed_m_per_s: *wind_speed_m_per_s,
                    horizontal_solar_w_per_m2: *horizontal_solar_w_per_m2,
                    air_density_kg_per_m3: *air_density_kg_per_m3,
                };
                Box::new(ConstantWeather::new(self.name.as_str(), sample)?.with_leap_year(*leap_year))
            }
            WeatherDef::Synthetic(def) => Box::new(def.to_source(&self.name)),
        };
        Ok(source)
    }

    /// Unsolved model wired with this site's soil, layout, controls,
    /// boundaries and weather.
    pub fn build_model(&self, base_dir: Option<&Path>) -> ProjectResult<FiniteDifferenceModel> {
        crate::validate_config(self)?;
        let mut model = FiniteDifferenceModel::new(self.name.as_str(), self.soil.to_properties()?)
            .with_boundaries(BoundaryConditions::from(&self.boundaries))
            .with_request(FullYearRequest {
                timesteps_per_hour: self.timesteps_per_hour,
            })
            .with_weather_source(self.weather_source(base_dir)?);
        if let Some(mesh) = &self.mesh {
            model = model.with_mesh(MeshConfig::from(mesh));
        }
        if let Some(solver) = &self.solver {
            model = model.with_solver(SolverConfig::from(solver));
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soil_percentages_become_fractions() {
        let soil = SoilDef::default().to_properties().unwrap();
        assert!((soil.moisture_content - 0.30).abs() < 1e-12);
        assert!((soil.saturated_moisture_content - 0.50).abs() < 1e-12);
        assert!((soil.density - 962.0).abs() < 1e-9);
    }

    #[test]
    fn boundary_defs_map_one_to_one() {
        let def = BoundariesDef {
            surface: SurfaceBoundaryDef::FixedTemperature { temperature_c: 4.0 },
            bottom: BottomBoundaryDef::Adiabatic,
        };
        let bc = BoundaryConditions::from(&def);
        assert_eq!(bc.surface, SurfaceBoundary::FixedTemperature(4.0));
        assert_eq!(bc.bottom, BottomBoundary::Adiabatic);
        assert_eq!(
            BoundaryConditions::from(&BoundariesDef::default()),
            BoundaryConditions::default()
        );
    }

    #[test]
    fn missing_epw_file_is_reported() {
        let config = SiteConfig {
            version: 1,
            name: "epw".to_string(),
            soil: SoilDef::default(),
            weather: WeatherDef::Epw {
                path: "does-not-exist.epw".into(),
            },
            timesteps_per_hour: 1,
            mesh: None,
            solver: None,
            boundaries: BoundariesDef::default(),
        };
        let dir = std::env::temp_dir().join("gt_project_no_such_dir");
        assert!(config.build_model(Some(&dir)).is_err());
    }
}
