//! gt-model: one-dimensional finite-difference ground temperature model.
//!
//! Pipeline: mesh → daily weather → Kusuda-Achenbach seed → annual passes of
//! implicit daily updates → depth/time lookup table.

pub mod annual;
pub mod boundary;
pub mod cell;
pub mod error;
pub mod init;
pub mod mesh;
pub mod model;
pub mod seed;
pub mod soil;
pub mod solver;
pub mod surface;
pub mod table;

pub use annual::{AnnualConvergenceDriver, AnnualOutcome};
pub use boundary::{BottomBoundary, BoundaryConditions, SurfaceBoundary};
pub use cell::{Cell, CellProperties, CellTemperatures};
pub use error::{ModelError, ModelResult};
pub use init::{InitialState, initialize};
pub use mesh::{MeshConfig, build_mesh};
pub use model::{FiniteDifferenceModel, SolvedProfile};
pub use seed::{GroundTemperatureModel, KusudaAchenbach};
pub use soil::{FreezeThawCapacities, SoilProperties};
pub use solver::{DayReport, SolverConfig, TimeStepSolver};
pub use surface::{SurfaceFluxes, surface_fluxes};
pub use table::GroundTemperatureTable;
