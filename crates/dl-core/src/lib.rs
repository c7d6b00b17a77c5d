//! dl-core: stable foundation for driveline.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + finite-input guard)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DlError, DlResult};
pub use numeric::*;
pub use units::*;
