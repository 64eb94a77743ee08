//! Implicit daily update of the soil column.
//!
//! Each cell balances its stored heat against conduction to its neighbours
//! and, at the faces of the column, the boundary terms. The coupled system is
//! relaxed by Gauss-Seidel sweeps from the surface downward until no cell
//! moves more than the inner tolerance.

use crate::boundary::{BottomBoundary, BoundaryConditions, MIN_CONVECTIVE_WIND, SurfaceBoundary};
use crate::cell::Cell;
use crate::error::{ModelError, ModelResult};
use crate::surface::{SurfaceFluxes, surface_fluxes};
use gt_core::{SECS_IN_DAY, ensure_positive};
use gt_weather::DailyWeatherRecord;
use tracing::trace;

/// Aerodynamic resistance numerator for the surface air film (s/m).
const AERODYNAMIC_RESISTANCE: f64 = 208.0;
/// Specific heat of air (J/kg·K).
const AIR_SPECIFIC_HEAT: f64 = 1003.0;

/// Convergence controls for the daily and annual iterations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Largest per-sweep change accepted as converged within a day (°C)
    pub inner_tolerance_c: f64,
    /// Sweep limit for one day
    pub max_inner_iterations: usize,
    /// Largest year-over-year change accepted as a periodic profile (°C)
    pub outer_tolerance_c: f64,
    /// Annual pass limit
    pub max_years: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            inner_tolerance_c: 1e-5,
            max_inner_iterations: 100_000,
            outer_tolerance_c: 0.05,
            max_years: 10,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> ModelResult<()> {
        ensure_positive(self.inner_tolerance_c, "inner tolerance")?;
        ensure_positive(self.outer_tolerance_c, "outer tolerance")?;
        if self.max_inner_iterations == 0 {
            return Err(ModelError::InvalidArg {
                what: "max_inner_iterations must be positive",
            });
        }
        if self.max_years == 0 {
            return Err(ModelError::InvalidArg {
                what: "max_years must be positive",
            });
        }
        Ok(())
    }
}

/// Outcome of one simulated day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayReport {
    pub sweeps: usize,
    /// Surface balance terms, when the energy balance is active
    pub surface: Option<SurfaceFluxes>,
}

/// Advances the cell array one day at a time.
#[derive(Clone, Copy, Debug)]
pub struct TimeStepSolver {
    pub config: SolverConfig,
    pub boundaries: BoundaryConditions,
    pub evapotranspiration_coeff: f64,
    /// Volumetric heat capacity applied to every cell (J/m³·K)
    pub volumetric_heat_capacity: f64,
}

impl TimeStepSolver {
    /// Refresh the capacity terms of every cell for a new day and reset the
    /// iteration baseline to the committed state.
    pub fn start_of_day(&self, cells: &mut [Cell]) {
        let rho_cp = self.volumetric_heat_capacity;
        for cell in cells.iter_mut() {
            cell.props.specific_heat = rho_cp / cell.props.density;
            cell.beta = SECS_IN_DAY / (rho_cp * cell.volume);
            cell.temps.prev_iteration = cell.temps.current;
        }
    }

    fn surface_temperature(
        &self,
        cells: &[Cell],
        weather: &DailyWeatherRecord,
        fluxes: Option<&SurfaceFluxes>,
    ) -> f64 {
        let this = &cells[0];
        if let SurfaceBoundary::FixedTemperature(t) = self.boundaries.surface {
            return t;
        }
        let below = &cells[1];
        let beta = this.beta;

        let mut numerator = this.temps.prev_timestep;
        let mut denominator = 1.0;

        let resistance = this.resistance_to(below);
        numerator += beta / resistance * below.temps.current;
        denominator += beta / resistance;

        let wind = weather.wind_speed_m_per_s;
        if wind > MIN_CONVECTIVE_WIND {
            let resistance = AERODYNAMIC_RESISTANCE
                / (weather.air_density_kg_per_m3 * AIR_SPECIFIC_HEAT * wind * this.conduction_area);
            numerator += beta / resistance * weather.dry_bulb_c;
            denominator += beta / resistance;
        }

        if let Some(fluxes) = fluxes {
            numerator += beta * fluxes.net_gain() * this.conduction_area;
        }

        numerator / denominator
    }

    fn interior_temperature(cells: &[Cell], index: usize) -> f64 {
        let this = &cells[index];
        let beta = this.beta;
        let mut numerator = this.temps.prev_timestep;
        let mut denominator = 1.0;
        for neighbour in [&cells[index - 1], &cells[index + 1]] {
            let resistance = this.resistance_to(neighbour);
            numerator += beta / resistance * neighbour.temps.current;
            denominator += beta / resistance;
        }
        numerator / denominator
    }

    fn bottom_temperature(&self, cells: &[Cell]) -> f64 {
        let index = cells.len() - 1;
        let this = &cells[index];
        let gradient = match self.boundaries.bottom {
            BottomBoundary::FixedTemperature(t) => return t,
            BottomBoundary::GeothermalFlux { gradient_k_per_m } => gradient_k_per_m,
            BottomBoundary::Adiabatic => 0.0,
        };
        let above = &cells[index - 1];
        let beta = this.beta;

        let mut numerator = this.temps.prev_timestep;
        let mut denominator = 1.0;

        let resistance = this.resistance_to(above);
        numerator += beta / resistance * above.temps.current;
        denominator += beta / resistance;

        numerator += beta * gradient * this.props.conductivity * this.conduction_area;

        numerator / denominator
    }

    /// One Gauss-Seidel pass from the surface down.
    ///
    /// Each cell reads the already-updated cell above and the not-yet-updated
    /// cell below.
    pub fn sweep(
        &self,
        cells: &mut [Cell],
        weather: &DailyWeatherRecord,
        fluxes: Option<&SurfaceFluxes>,
    ) -> ModelResult<()> {
        let last = cells.len() - 1;
        for index in 0..=last {
            let t = match index {
                0 => self.surface_temperature(cells, weather, fluxes),
                i if i == last => self.bottom_temperature(cells),
                i => Self::interior_temperature(cells, i),
            };
            if !t.is_finite() {
                return Err(ModelError::NonPhysical {
                    what: format!("cell {} temperature became {t}", cells[index].id),
                });
            }
            cells[index].temps.current = t;
        }
        Ok(())
    }

    /// True when no cell moved more than the inner tolerance in the last sweep.
    pub fn is_converged(&self, cells: &[Cell]) -> bool {
        cells.iter().all(|cell| {
            (cell.temps.current - cell.temps.prev_iteration).abs() < self.config.inner_tolerance_c
        })
    }

    /// Solve one day, commit the result as the new previous-timestep state
    /// and write it into `row`.
    pub fn advance_day(
        &self,
        cells: &mut [Cell],
        weather: &DailyWeatherRecord,
        row: &mut [f64],
    ) -> ModelResult<DayReport> {
        if cells.len() < 2 {
            return Err(ModelError::InvalidArg {
                what: "solver needs at least two cells",
            });
        }
        if row.len() != cells.len() {
            return Err(ModelError::InvalidArg {
                what: "table row must hold one value per cell",
            });
        }

        self.start_of_day(cells);
        let fluxes = match self.boundaries.surface {
            SurfaceBoundary::EnergyBalance => Some(surface_fluxes(
                weather,
                cells[0].temps.prev_timestep,
                self.evapotranspiration_coeff,
            )),
            _ => None,
        };

        let mut sweeps = 0;
        loop {
            self.sweep(cells, weather, fluxes.as_ref())?;
            sweeps += 1;
            if self.is_converged(cells) {
                break;
            }
            if sweeps >= self.config.max_inner_iterations {
                return Err(ModelError::ConvergenceFailed {
                    what: format!(
                        "daily update still moving after {sweeps} sweeps (tolerance {} °C)",
                        self.config.inner_tolerance_c
                    ),
                });
            }
            for cell in cells.iter_mut() {
                cell.temps.prev_iteration = cell.temps.current;
            }
        }
        trace!(sweeps, surface_c = cells[0].temps.current, "day converged");

        for (cell, slot) in cells.iter_mut().zip(row.iter_mut()) {
            cell.temps.prev_timestep = cell.temps.current;
            *slot = cell.temps.current;
        }

        Ok(DayReport {
            sweeps,
            surface: fluxes,
        })
    }
}
