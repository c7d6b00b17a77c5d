//! dl-sim: vehicle orchestration and the fixed-step drive loop.
//!
//! Provides:
//! - `Vehicle`: single owner of the powertrain components, exposing the
//!   command surface (start/stop/shift/throttle/brake/refuel) and the
//!   per-tick `step(dt)` update sequence
//! - `Telemetry`: read-only snapshots for dashboards and exports
//! - `Scenario`: YAML drive scripts with one-shot and windowed events
//! - `run_scenario`: fixed-step runner with decimated recording

pub mod error;
pub mod scenario;
pub mod sim;
pub mod telemetry;
pub mod vehicle;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use scenario::{Command, Event, Scenario, VehicleOverrides};
pub use sim::{SimOptions, SimRecord, run_scenario};
pub use telemetry::Telemetry;
pub use vehicle::{DEFAULT_BRAKE_INTENSITY, DEFAULT_DT, DEFAULT_THROTTLE_STEP, Vehicle, VehicleConfig};
