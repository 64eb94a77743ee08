//! Boundary conditions at the top and bottom of the soil column.

use crate::error::{ModelError, ModelResult};
use gt_core::ensure_finite;

/// Wind speed below which air-side convection at the surface is ignored (m/s).
pub const MIN_CONVECTIVE_WIND: f64 = 0.1;
/// Geothermal temperature gradient at the column bottom (K/m).
pub const GEOTHERMAL_GRADIENT: f64 = 0.025;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SurfaceBoundary {
    /// Convection to outdoor air plus the net radiation/evapotranspiration
    /// balance.
    #[default]
    EnergyBalance,
    /// Convection to outdoor air only.
    ConvectionOnly,
    /// Surface cell held at a fixed temperature (°C).
    FixedTemperature(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BottomBoundary {
    /// Upward conductive flux driven by a temperature gradient (K/m).
    GeothermalFlux { gradient_k_per_m: f64 },
    /// No flux through the bottom face.
    Adiabatic,
    /// Bottom cell held at a fixed temperature (°C).
    FixedTemperature(f64),
}

impl Default for BottomBoundary {
    fn default() -> Self {
        Self::GeothermalFlux {
            gradient_k_per_m: GEOTHERMAL_GRADIENT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundaryConditions {
    pub surface: SurfaceBoundary,
    pub bottom: BottomBoundary,
}

impl BoundaryConditions {
    pub fn validate(&self) -> ModelResult<()> {
        if let SurfaceBoundary::FixedTemperature(t) = self.surface {
            ensure_finite(t, "fixed surface temperature")?;
        }
        match self.bottom {
            BottomBoundary::GeothermalFlux { gradient_k_per_m } => {
                ensure_finite(gradient_k_per_m, "geothermal gradient")?;
            }
            BottomBoundary::FixedTemperature(t) => {
                ensure_finite(t, "fixed bottom temperature")?;
            }
            BottomBoundary::Adiabatic => {}
        }
        Ok(())
    }

    /// Conditions with both faces held at the same temperature.
    pub fn fixed(t_c: f64) -> ModelResult<Self> {
        let bc = Self {
            surface: SurfaceBoundary::FixedTemperature(t_c),
            bottom: BottomBoundary::FixedTemperature(t_c),
        };
        bc.validate().map_err(|_| ModelError::InvalidArg {
            what: "fixed boundary temperature must be finite",
        })?;
        Ok(bc)
    }
}
