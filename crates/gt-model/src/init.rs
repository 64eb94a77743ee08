//! Seeding of the cell temperatures before the first annual pass.

use crate::cell::{Cell, CellTemperatures};
use crate::error::ModelResult;
use crate::seed::KusudaAchenbach;
use crate::soil::{FreezeThawCapacities, SoilProperties};
use gt_weather::AnnualWeather;
use tracing::debug;

/// What the initializer derived besides the cell temperatures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialState {
    pub seed: KusudaAchenbach,
    pub capacities: FreezeThawCapacities,
    /// Volumetric heat capacity the solver applies to every cell (J/m³·K)
    pub volumetric_heat_capacity: f64,
}

/// Seed every cell from the periodic model at its mid-depth at the start of
/// the year.
///
/// All four temperature slots receive the seed value. The unfrozen soil
/// capacity is always the one applied.
pub fn initialize(
    cells: &mut [Cell],
    weather: &AnnualWeather,
    soil: &SoilProperties,
) -> ModelResult<InitialState> {
    let seed = KusudaAchenbach::from_weather(weather, soil.diffusivity())?;
    let capacities = soil.freeze_thaw_capacities();

    for cell in cells.iter_mut() {
        cell.volume = cell.thickness * cell.conduction_area;
        cell.temps = CellTemperatures::uniform(seed.temperature(cell.mid_depth(), 0.0));
    }

    debug!(
        cells = cells.len(),
        mean_c = seed.mean_c,
        amplitude_c = seed.amplitude_c,
        phase_days = weather.day_of_min(),
        rho_cp_liquid = capacities.liquid,
        rho_cp_transient = capacities.transient,
        rho_cp_ice = capacities.ice,
        "seeded ground column"
    );

    Ok(InitialState {
        seed,
        capacities,
        volumetric_heat_capacity: soil.volumetric_heat_capacity(),
    })
}
