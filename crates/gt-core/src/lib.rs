//! gt-core: shared foundation for the ground temperature workspace.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + validation and interpolation helpers)
//! - calendar (day/year constants shared by weather and model)
//! - ids (compact 1-based cell identifiers)
//! - error (shared error types)

pub mod calendar;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use calendar::*;
pub use error::{GtError, GtResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
