//! Error types for weather operations.

use thiserror::Error;

/// Errors raised while reading or replaying weather data.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("No weather source available: {what}")]
    Unavailable { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Parse error on line {line}: {what}")]
    Parse { line: usize, what: String },

    #[error("Incomplete weather data: expected {expected}, found {found}")]
    Incomplete { expected: String, found: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WeatherResult<T> = Result<T, WeatherError>;
