//! Repeated annual passes until the profile is periodic.

use crate::cell::Cell;
use crate::error::{ModelError, ModelResult};
use crate::solver::TimeStepSolver;
use crate::table::GroundTemperatureTable;
use gt_weather::AnnualWeather;
use tracing::{debug, info, warn};

/// How the annual iteration ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnualOutcome {
    /// Annual passes run
    pub years: usize,
    /// False when the pass limit was reached first
    pub converged: bool,
    /// Largest end-of-year change in the final pass (°C)
    pub max_delta_c: f64,
    /// Gauss-Seidel sweeps over all passes
    pub total_sweeps: usize,
}

/// Runs whole years of daily updates, comparing each year's final profile
/// against the previous one.
#[derive(Clone, Copy, Debug)]
pub struct AnnualConvergenceDriver {
    pub solver: TimeStepSolver,
}

impl AnnualConvergenceDriver {
    pub fn new(solver: TimeStepSolver) -> Self {
        Self { solver }
    }

    /// Largest change since the previous year's end, recording the current
    /// profile as the new reference.
    fn end_of_year(cells: &mut [Cell]) -> f64 {
        let mut max_delta: f64 = 0.0;
        for cell in cells.iter_mut() {
            max_delta = max_delta.max((cell.temps.current - cell.temps.prev_year).abs());
            cell.temps.prev_year = cell.temps.current;
        }
        max_delta
    }

    pub fn run(
        &self,
        cells: &mut [Cell],
        weather: &AnnualWeather,
        table: &mut GroundTemperatureTable,
    ) -> ModelResult<AnnualOutcome> {
        if table.days_in_year() != weather.days_in_year() || table.cell_count() != cells.len() {
            return Err(ModelError::InvalidArg {
                what: "table shape must match the weather year and the mesh",
            });
        }
        let config = &self.solver.config;

        let mut total_sweeps = 0;
        let mut max_delta_c = f64::INFINITY;
        for year in 1..=config.max_years {
            let mut sweeps = 0;
            for (day_index, record) in weather.days().iter().enumerate() {
                let row = table.row_mut(day_index).ok_or(ModelError::InvalidArg {
                    what: "table row out of range",
                })?;
                sweeps += self.solver.advance_day(cells, record, row)?.sweeps;
            }
            total_sweeps += sweeps;
            max_delta_c = Self::end_of_year(cells);
            debug!(year, sweeps, max_delta_c, "annual pass complete");

            if max_delta_c < config.outer_tolerance_c {
                info!(years = year, max_delta_c, "ground profile converged");
                return Ok(AnnualOutcome {
                    years: year,
                    converged: true,
                    max_delta_c,
                    total_sweeps,
                });
            }
        }

        warn!(
            years = config.max_years,
            max_delta_c,
            tolerance_c = config.outer_tolerance_c,
            "ground profile not periodic at the annual pass limit; using last year"
        );
        Ok(AnnualOutcome {
            years: config.max_years,
            converged: false,
            max_delta_c,
            total_sweeps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BottomBoundary, BoundaryConditions, SurfaceBoundary};
    use crate::cell::CellTemperatures;
    use crate::mesh::{MeshConfig, build_mesh};
    use crate::soil::SoilProperties;
    use crate::solver::SolverConfig;
    use gt_weather::DailyWeatherRecord;

    fn coarse() -> MeshConfig {
        MeshConfig {
            surface_layer_thickness: 0.4,
            surface_cell_thickness: 0.1,
            center_cell_count: 2,
            center_expansion_ratio: 1.2,
            deep_layer_thickness: 0.2,
            deep_cell_thickness: 0.1,
        }
    }

    fn constant_year(t: f64) -> AnnualWeather {
        let day = DailyWeatherRecord {
            dry_bulb_c: t,
            relative_humidity: 0.5,
            wind_speed_m_per_s: 2.0,
            horizontal_solar_w_per_m2: 0.0,
            air_density_kg_per_m3: 1.2,
        };
        AnnualWeather::from_daily(vec![day; 365]).unwrap()
    }

    fn driver(boundaries: BoundaryConditions, config: SolverConfig) -> AnnualConvergenceDriver {
        let soil = SoilProperties::default();
        AnnualConvergenceDriver::new(TimeStepSolver {
            config,
            boundaries,
            evapotranspiration_coeff: soil.evapotranspiration_coeff,
            volumetric_heat_capacity: soil.volumetric_heat_capacity(),
        })
    }

    fn column(t: f64) -> (Vec<Cell>, GroundTemperatureTable) {
        let mut cells = build_mesh(&coarse(), &SoilProperties::default());
        for cell in cells.iter_mut() {
            cell.temps = CellTemperatures::uniform(t);
        }
        let depths = cells.iter().map(Cell::mid_depth).collect();
        (cells, GroundTemperatureTable::new(depths, 365).unwrap())
    }

    #[test]
    fn equilibrium_converges_in_one_year() {
        let (mut cells, mut table) = column(8.0);
        let bc = BoundaryConditions {
            surface: SurfaceBoundary::ConvectionOnly,
            bottom: BottomBoundary::Adiabatic,
        };
        let outcome = driver(bc, SolverConfig::default())
            .run(&mut cells, &constant_year(8.0), &mut table)
            .unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.years, 1);
        assert_eq!(outcome.total_sweeps, 365);
    }

    #[test]
    fn pass_limit_reports_non_convergence() {
        let (mut cells, mut table) = column(20.0);
        let config = SolverConfig {
            max_years: 1,
            ..SolverConfig::default()
        };
        let outcome = driver(BoundaryConditions::fixed(0.0).unwrap(), config)
            .run(&mut cells, &constant_year(0.0), &mut table)
            .unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.years, 1);
        assert!(outcome.max_delta_c > 1.0);
        // table still holds the last pass
        assert_eq!(table.value(364, 0), Some(0.0));
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let (mut cells, _) = column(5.0);
        let mut table = GroundTemperatureTable::new(vec![0.1, 0.2], 365).unwrap();
        let result = driver(BoundaryConditions::default(), SolverConfig::default()).run(
            &mut cells,
            &constant_year(5.0),
            &mut table,
        );
        assert!(result.is_err());
    }
}
