//! Weather collaborator seam for the ground temperature model.
//!
//! Provides:
//! - `WeatherSource`: anything that can replay one full calendar year of samples
//! - `WeatherAggregator`: reduces sub-hourly samples to one record per day
//! - Concrete sources: constant, synthetic (seasonal + diurnal), EPW files

pub mod aggregate;
pub mod constant;
pub mod epw;
pub mod error;
pub mod psychro;
pub mod source;
pub mod synthetic;

pub use aggregate::{AnnualWeather, DailyWeatherRecord, WeatherAggregator};
pub use constant::ConstantWeather;
pub use epw::EpwWeather;
pub use error::{WeatherError, WeatherResult};
pub use source::{FullYearRequest, SampleStamp, WeatherSample, WeatherSource};
pub use synthetic::SyntheticWeather;
