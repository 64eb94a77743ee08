//! Finite-difference ground temperature model: builds, seeds and solves the
//! soil column on first use and answers depth/time queries from the stored
//! annual profile.

use crate::annual::{AnnualConvergenceDriver, AnnualOutcome};
use crate::boundary::BoundaryConditions;
use crate::cell::Cell;
use crate::error::{ModelError, ModelResult};
use crate::init::{InitialState, initialize};
use crate::mesh::{MeshConfig, build_mesh};
use crate::seed::GroundTemperatureModel;
use crate::soil::{FreezeThawCapacities, SoilProperties};
use crate::solver::{SolverConfig, TimeStepSolver};
use crate::table::GroundTemperatureTable;
use gt_core::units::{Length, Temperature, Time, degc};
use gt_weather::{AnnualWeather, FullYearRequest, WeatherAggregator, WeatherError, WeatherSource};
use tracing::info;
use uom::si::length::meter;
use uom::si::time::second;

/// Where the model gets its year of daily weather.
enum WeatherInput {
    Missing,
    Source(Box<dyn WeatherSource>),
    Daily(AnnualWeather),
}

/// Everything produced by a completed solve.
#[derive(Clone, Debug)]
pub struct SolvedProfile {
    pub cells: Vec<Cell>,
    pub weather: AnnualWeather,
    pub initial: InitialState,
    pub outcome: AnnualOutcome,
    pub table: GroundTemperatureTable,
}

pub struct FiniteDifferenceModel {
    name: String,
    soil: SoilProperties,
    mesh: MeshConfig,
    solver: SolverConfig,
    boundaries: BoundaryConditions,
    request: FullYearRequest,
    weather: WeatherInput,
    solved: Option<SolvedProfile>,
}

impl FiniteDifferenceModel {
    pub fn new(name: impl Into<String>, soil: SoilProperties) -> Self {
        Self {
            name: name.into(),
            soil,
            mesh: MeshConfig::default(),
            solver: SolverConfig::default(),
            boundaries: BoundaryConditions::default(),
            request: FullYearRequest::default(),
            weather: WeatherInput::Missing,
            solved: None,
        }
    }

    pub fn with_mesh(mut self, mesh: MeshConfig) -> Self {
        self.mesh = mesh;
        self.solved = None;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self.solved = None;
        self
    }

    pub fn with_boundaries(mut self, boundaries: BoundaryConditions) -> Self {
        self.boundaries = boundaries;
        self.solved = None;
        self
    }

    pub fn with_request(mut self, request: FullYearRequest) -> Self {
        self.request = request;
        self.solved = None;
        self
    }

    /// Weather replayed once, on the first query, to build the daily year.
    pub fn with_weather_source(mut self, source: Box<dyn WeatherSource>) -> Self {
        self.weather = WeatherInput::Source(source);
        self.solved = None;
        self
    }

    /// Daily weather that has already been aggregated.
    pub fn with_annual_weather(mut self, weather: AnnualWeather) -> Self {
        self.weather = WeatherInput::Daily(weather);
        self.solved = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn soil(&self) -> &SoilProperties {
        &self.soil
    }

    pub fn is_solved(&self) -> bool {
        self.solved.is_some()
    }

    pub fn profile(&self) -> Option<&SolvedProfile> {
        self.solved.as_ref()
    }

    pub fn outcome(&self) -> Option<&AnnualOutcome> {
        self.solved.as_ref().map(|s| &s.outcome)
    }

    pub fn capacities(&self) -> Option<&FreezeThawCapacities> {
        self.solved.as_ref().map(|s| &s.initial.capacities)
    }

    pub fn table(&self) -> Option<&GroundTemperatureTable> {
        self.solved.as_ref().map(|s| &s.table)
    }

    fn annual_weather(&mut self) -> ModelResult<AnnualWeather> {
        match &mut self.weather {
            WeatherInput::Daily(weather) => Ok(weather.clone()),
            WeatherInput::Source(source) => {
                Ok(WeatherAggregator::new(self.request).aggregate(source.as_mut())?)
            }
            WeatherInput::Missing => Err(ModelError::Weather(WeatherError::Unavailable {
                what: format!("no weather source configured for ground model '{}'", self.name),
            })),
        }
    }

    /// Build the mesh, aggregate weather, seed and iterate to a periodic
    /// profile. Runs once; later calls return the stored result.
    pub fn solve(&mut self) -> ModelResult<&SolvedProfile> {
        let profile = match self.solved.take() {
            Some(profile) => profile,
            None => self.run()?,
        };
        Ok(self.solved.insert(profile))
    }

    fn run(&mut self) -> ModelResult<SolvedProfile> {
        self.soil.validate()?;
        self.mesh.validate()?;
        self.solver.validate()?;
        self.boundaries.validate()?;

        let mut cells = build_mesh(&self.mesh, &self.soil);
        let weather = self.annual_weather()?;
        let initial = initialize(&mut cells, &weather, &self.soil)?;

        let depths = cells.iter().map(Cell::mid_depth).collect();
        let mut table = GroundTemperatureTable::new(depths, weather.days_in_year())?;

        let driver = AnnualConvergenceDriver::new(TimeStepSolver {
            config: self.solver,
            boundaries: self.boundaries,
            evapotranspiration_coeff: self.soil.evapotranspiration_coeff,
            volumetric_heat_capacity: initial.volumetric_heat_capacity,
        });
        let outcome = driver.run(&mut cells, &weather, &mut table)?;

        info!(
            model = %self.name,
            cells = cells.len(),
            years = outcome.years,
            converged = outcome.converged,
            max_delta_c = outcome.max_delta_c,
            "ground temperature model solved"
        );

        Ok(SolvedProfile {
            cells,
            weather,
            initial,
            outcome,
            table,
        })
    }

    /// Temperature (°C) at a depth and a day-of-year coordinate.
    pub fn temperature(&mut self, depth_m: f64, day_of_year: f64) -> ModelResult<f64> {
        Ok(self.solve()?.table.temperature(depth_m, day_of_year))
    }

    /// Typed form of [`GroundTemperatureModel::temperature_at_seconds`].
    pub fn temperature_at(&mut self, depth: Length, time: Time) -> ModelResult<Temperature> {
        let t = self.temperature_at_seconds(depth.get::<meter>(), time.get::<second>())?;
        Ok(degc(t))
    }
}

impl GroundTemperatureModel for FiniteDifferenceModel {
    fn temperature_at_seconds(&mut self, depth_m: f64, seconds: f64) -> ModelResult<f64> {
        Ok(self.solve()?.table.temperature_at_seconds(depth_m, seconds))
    }

    fn temperature_at_month(&mut self, depth_m: f64, month: u32) -> ModelResult<f64> {
        Ok(self.solve()?.table.temperature_at_month(depth_m, month))
    }
}
