//! Error types for the ground temperature model.

use gt_core::GtError;
use gt_weather::WeatherError;
use thiserror::Error;

/// Errors raised while building or solving the ground model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Core error: {0}")]
    Core(#[from] GtError),
}

pub type ModelResult<T> = Result<T, ModelError>;
