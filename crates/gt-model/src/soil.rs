//! Soil thermal properties and the volumetric heat capacities of the
//! freeze/thaw states.

use crate::error::{ModelError, ModelResult};
use gt_core::units::{Density, Ratio, SpecificHeat, ThermalConductivity};
use gt_core::{ensure_finite, ensure_positive};
use uom::si::mass_density::kilogram_per_cubic_meter;
use uom::si::ratio::ratio;
use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
use uom::si::thermal_conductivity::watt_per_meter_kelvin;

const WATER_DENSITY: f64 = 1_000.0;
const ICE_DENSITY: f64 = 917.0;
const WATER_SPECIFIC_HEAT: f64 = 4_180.0;
const ICE_SPECIFIC_HEAT: f64 = 2_066.0;
const LATENT_HEAT_OF_FUSION: f64 = 334_000.0;
/// Volumetric heat capacity of dry mineral solids (J/m³·K).
const DRY_SOLIDS_RHO_CP: f64 = 1.225e6;
/// Width of the freezing band used to smear the latent heat (K).
const FREEZING_BAND: f64 = 0.4;
/// Temperature span of the band below the freezing point (K).
const FREEZING_BAND_OFFSET: f64 = 0.1;

/// Homogeneous soil description.
///
/// Moisture contents are volume fractions in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoilProperties {
    /// Thermal conductivity (W/m·K)
    pub conductivity: f64,
    /// Density (kg/m³)
    pub density: f64,
    /// Specific heat (J/kg·K)
    pub specific_heat: f64,
    /// Volumetric moisture content
    pub moisture_content: f64,
    /// Volumetric moisture content at saturation
    pub saturated_moisture_content: f64,
    /// Scaling applied to the radiative term of the evapotranspiration estimate
    pub evapotranspiration_coeff: f64,
}

impl Default for SoilProperties {
    fn default() -> Self {
        Self {
            conductivity: 1.08,
            density: 962.0,
            specific_heat: 2_576.0,
            moisture_content: 0.30,
            saturated_moisture_content: 0.50,
            evapotranspiration_coeff: 0.408,
        }
    }
}

impl SoilProperties {
    pub fn from_quantities(
        conductivity: ThermalConductivity,
        density: Density,
        specific_heat: SpecificHeat,
        moisture_content: Ratio,
        saturated_moisture_content: Ratio,
        evapotranspiration_coeff: f64,
    ) -> ModelResult<Self> {
        let soil = Self {
            conductivity: conductivity.get::<watt_per_meter_kelvin>(),
            density: density.get::<kilogram_per_cubic_meter>(),
            specific_heat: specific_heat.get::<joule_per_kilogram_kelvin>(),
            moisture_content: moisture_content.get::<ratio>(),
            saturated_moisture_content: saturated_moisture_content.get::<ratio>(),
            evapotranspiration_coeff,
        };
        soil.validate()?;
        Ok(soil)
    }

    pub fn validate(&self) -> ModelResult<()> {
        ensure_positive(self.conductivity, "soil conductivity")?;
        ensure_positive(self.density, "soil density")?;
        ensure_positive(self.specific_heat, "soil specific heat")?;
        ensure_finite(self.evapotranspiration_coeff, "evapotranspiration coefficient")?;
        if !(0.0..=1.0).contains(&self.moisture_content) {
            return Err(ModelError::InvalidArg {
                what: "moisture content must be a fraction",
            });
        }
        if !(0.0..1.0).contains(&self.saturated_moisture_content) {
            return Err(ModelError::InvalidArg {
                what: "saturated moisture content must be a fraction below 1",
            });
        }
        Ok(())
    }

    /// Thermal diffusivity k/(ρ·cp) in m²/s.
    pub fn diffusivity(&self) -> f64 {
        self.conductivity / (self.density * self.specific_heat)
    }

    /// Volumetric heat capacity ρ·cp in J/m³·K.
    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.density * self.specific_heat
    }

    /// Volumetric heat capacities for unfrozen, freezing and frozen soil.
    pub fn freeze_thaw_capacities(&self) -> FreezeThawCapacities {
        let theta_sat = self.saturated_moisture_content;
        let theta_liq = self.moisture_content;
        // all pore water is assumed to freeze
        let theta_ice = theta_liq;

        let solids = DRY_SOLIDS_RHO_CP / (1.0 - theta_sat) * (1.0 - theta_sat);

        let transient_cp = LATENT_HEAT_OF_FUSION / FREEZING_BAND
            + (0.5 * ICE_SPECIFIC_HEAT
                - (WATER_SPECIFIC_HEAT + ICE_SPECIFIC_HEAT) / 2.0 * FREEZING_BAND_OFFSET)
                / FREEZING_BAND;

        FreezeThawCapacities {
            liquid: solids + WATER_DENSITY * WATER_SPECIFIC_HEAT * theta_liq,
            transient: solids + (WATER_DENSITY + ICE_DENSITY) / 2.0 * transient_cp * theta_ice,
            ice: solids + ICE_DENSITY * ICE_SPECIFIC_HEAT * theta_ice,
        }
    }
}

/// Volumetric heat capacities (J/m³·K) of the three moisture states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreezeThawCapacities {
    pub liquid: f64,
    pub transient: f64,
    pub ice: f64,
}
