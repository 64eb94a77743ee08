//! Site configuration schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    pub version: u32,
    pub name: String,
    pub soil: SoilDef,
    pub weather: WeatherDef,
    #[serde(default = "default_timesteps_per_hour")]
    pub timesteps_per_hour: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
    #[serde(default)]
    pub boundaries: BoundariesDef,
}

fn default_timesteps_per_hour() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilDef {
    pub conductivity_w_per_m_k: f64,
    pub density_kg_per_m3: f64,
    pub specific_heat_j_per_kg_k: f64,
    /// Volumetric moisture content, percent
    pub moisture_content_pct: f64,
    /// Volumetric moisture content at saturation, percent
    pub saturated_moisture_content_pct: f64,
    #[serde(default = "default_evapotranspiration_coeff")]
    pub evapotranspiration_coeff: f64,
}

fn default_evapotranspiration_coeff() -> f64 {
    0.408
}

impl Default for SoilDef {
    fn default() -> Self {
        Self {
            conductivity_w_per_m_k: 1.08,
            density_kg_per_m3: 962.0,
            specific_heat_j_per_kg_k: 2576.0,
            moisture_content_pct: 30.0,
            saturated_moisture_content_pct: 50.0,
            evapotranspiration_coeff: default_evapotranspiration_coeff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeatherDef {
    /// EnergyPlus weather file; relative paths resolve against the config file.
    Epw { path: PathBuf },
    Constant {
        dry_bulb_c: f64,
        /// Fraction 0..=1
        relative_humidity: f64,
        wind_speed_m_per_s: f64,
        #[serde(default)]
        horizontal_solar_w_per_m2: f64,
        #[serde(default = "default_air_density")]
        air_density_kg_per_m3: f64,
        #[serde(default)]
        leap_year: bool,
    },
    Synthetic(SyntheticDef),
}

fn default_air_density() -> f64 {
    1.2
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyntheticDef {
    pub mean_dry_bulb_c: f64,
    pub amplitude_c: f64,
    pub coldest_day: usize,
    pub diurnal_amplitude_c: f64,
    pub relative_humidity: f64,
    pub wind_speed_m_per_s: f64,
    pub latitude_deg: f64,
    pub peak_beam_normal_w_per_m2: f64,
    pub diffuse_fraction: f64,
    pub leap_year: bool,
}

impl Default for SyntheticDef {
    fn default() -> Self {
        Self {
            mean_dry_bulb_c: 10.0,
            amplitude_c: 12.0,
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeshDef {
    pub surface_layer_thickness_m: f64,
    pub surface_cell_thickness_m: f64,
    pub center_cell_count: usize,
    pub center_expansion_ratio: f64,
    pub deep_layer_thickness_m: f64,
    pub deep_cell_thickness_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    pub inner_tolerance_c: f64,
    pub max_inner_iterations: usize,
    pub outer_tolerance_c: f64,
    pub max_years: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundariesDef {
    #[serde(default)]
    pub surface: SurfaceBoundaryDef,
    #[serde(default)]
    pub bottom: BottomBoundaryDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceBoundaryDef {
    #[default]
    EnergyBalance,
    ConvectionOnly,
    FixedTemperature { temperature_c: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BottomBoundaryDef {
    GeothermalFlux {
        #[serde(default = "default_geothermal_gradient")]
        gradient_k_per_m: f64,
    },
    Adiabatic,
    FixedTemperature { temperature_c: f64 },
}

fn default_geothermal_gradient() -> f64 {
    gt_model::boundary::GEOTHERMAL_GRADIENT
}

impl Default for BottomBoundaryDef {
    fn default() -> Self {
        Self::GeothermalFlux {
            gradient_k_per_m: default_geothermal_gradient(),
        }
    }
}
