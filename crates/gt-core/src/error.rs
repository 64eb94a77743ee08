use thiserror::Error;

pub type GtResult<T> = Result<T, GtError>;

#[derive(Error, Debug)]
pub enum GtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
