//! dl-components: powertrain component library.
//!
//! Provides the physical pieces of the drivetrain model:
//! - Fuel tank (bounded reservoir with validated mutation)
//! - Engine (throttle + RPM → torque, fuel draw, auto-shutoff)
//! - Gearbox (discrete ratios, shift legality, torque transmission)
//! - Wheel (torque → traction force and angular/linear velocity)
//!
//! Components never store references to each other. Collaborators are
//! passed into operations as arguments (the engine borrows the tank for a
//! tick, the gearbox is handed the engine torque), so a single owner can
//! compose them without interior mutability.
//!
//! # Example
//!
//! ```
//! use dl_components::{Engine, EngineParams, FuelTank};
//! use dl_core::units::{kw, liters};
//!
//! let mut tank = FuelTank::with_level(liters(50.0), liters(30.0)).unwrap();
//! let mut engine = Engine::new(EngineParams {
//!     max_power: kw(150.0),
//!     rpm_max: 7000.0,
//! })
//! .unwrap();
//!
//! assert!(engine.start(&tank));
//! engine.update(&mut tank, 0.05).unwrap();
//! assert!(engine.is_running());
//! assert!(engine.torque() > 0.0);
//! ```

pub mod common;
pub mod engine;
pub mod error;
pub mod fuel_tank;
pub mod gearbox;
pub mod notify;
pub mod wheel;

// Re-exports
pub use engine::{Engine, EngineParams, FuelStatus};
pub use error::{ComponentError, ComponentResult};
pub use fuel_tank::FuelTank;
pub use gearbox::{GearCommand, GearState, Gearbox};
pub use notify::{Notification, NotificationSlot, Severity};
pub use wheel::Wheel;
