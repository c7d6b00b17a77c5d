//! Fuel tank: a bounded reservoir with validated mutation.

use crate::error::{ComponentError, ComponentResult};
use dl_core::units::Volume;
use uom::si::ratio::ratio;

/// Bounded fuel reservoir.
///
/// Invariant: `0 <= level <= capacity` at all times. The level is only
/// mutated through [`FuelTank::refuel`] and [`FuelTank::consume`], both of
/// which reject non-positive amounts.
#[derive(Clone, Debug)]
pub struct FuelTank {
    capacity: Volume,
    level: Volume,
}

impl FuelTank {
    /// Create an empty tank.
    ///
    /// # Errors
    /// Returns an error if `capacity` is not a positive, finite volume.
    pub fn new(capacity: Volume) -> ComponentResult<Self> {
        if !capacity.value.is_finite() || capacity.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "tank capacity must be positive",
            });
        }
        Ok(Self {
            capacity,
            level: Volume::default(),
        })
    }

    /// Create a tank with an initial fuel level.
    ///
    /// # Errors
    /// Returns an error if the capacity is invalid or the level lies
    /// outside `[0, capacity]`.
    pub fn with_level(capacity: Volume, level: Volume) -> ComponentResult<Self> {
        let mut tank = Self::new(capacity)?;
        if !tank.set_level(level) {
            return Err(ComponentError::InvalidArg {
                what: "initial level must be within [0, capacity]",
            });
        }
        Ok(tank)
    }

    /// Set the level directly. Rejected (no change) outside `[0, capacity]`.
    pub fn set_level(&mut self, level: Volume) -> bool {
        if level.value.is_finite() && level.value >= 0.0 && level <= self.capacity {
            self.level = level;
            true
        } else {
            false
        }
    }

    /// Add fuel.
    ///
    /// Returns `true` when the full amount fit. A non-positive amount is
    /// rejected with no state change. If the amount would overflow the
    /// tank, the level is clamped to capacity and `false` is returned so
    /// the caller can distinguish "filled completely" from "capped".
    pub fn refuel(&mut self, amount: Volume) -> bool {
        if !amount.value.is_finite() || amount.value <= 0.0 {
            return false;
        }
        let new_level = self.level + amount;
        if new_level <= self.capacity {
            self.level = new_level;
            true
        } else {
            self.level = self.capacity;
            false
        }
    }

    /// Draw fuel.
    ///
    /// Fails with no state change if the amount is non-positive or
    /// exceeds the current level.
    pub fn consume(&mut self, amount: Volume) -> bool {
        if !amount.value.is_finite() || amount.value <= 0.0 {
            return false;
        }
        if self.level >= amount {
            self.level -= amount;
            true
        } else {
            false
        }
    }

    pub fn capacity(&self) -> Volume {
        self.capacity
    }

    pub fn level(&self) -> Volume {
        self.level
    }

    /// Remaining space before the tank is full.
    pub fn headroom(&self) -> Volume {
        self.capacity - self.level
    }

    pub fn percent_full(&self) -> f64 {
        (self.level / self.capacity).get::<ratio>() * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.level.value <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.level >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::units::{as_liters, liters};
    use proptest::prelude::*;

    #[test]
    fn new_tank_starts_empty() {
        let tank = FuelTank::new(liters(50.0)).unwrap();
        assert!(tank.is_empty());
        assert!(!tank.is_full());
        assert_eq!(tank.percent_full(), 0.0);
    }

    #[test]
    fn rejects_non_positive_capacity() {
        assert!(FuelTank::new(liters(0.0)).is_err());
        assert!(FuelTank::new(liters(-10.0)).is_err());
    }

    #[test]
    fn with_level_validates_range() {
        assert!(FuelTank::with_level(liters(50.0), liters(60.0)).is_err());
        let tank = FuelTank::with_level(liters(50.0), liters(25.0)).unwrap();
        assert!((tank.percent_full() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn refuel_rejects_non_positive() {
        let mut tank = FuelTank::new(liters(50.0)).unwrap();
        assert!(!tank.refuel(liters(0.0)));
        assert!(!tank.refuel(liters(-5.0)));
        assert!(tank.is_empty());
    }

    #[test]
    fn refuel_overfill_clamps_and_reports_partial() {
        // level=45, capacity=50, refuel 10 → level=50, false
        let mut tank = FuelTank::with_level(liters(50.0), liters(45.0)).unwrap();
        assert!(!tank.refuel(liters(10.0)));
        assert!(tank.is_full());
        assert!((as_liters(tank.level()) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn consume_insufficient_leaves_level_unchanged() {
        // level=3, consume 5 → unchanged, false
        let mut tank = FuelTank::with_level(liters(50.0), liters(3.0)).unwrap();
        assert!(!tank.consume(liters(5.0)));
        assert!((as_liters(tank.level()) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn consume_exact_level_drains_to_empty() {
        let mut tank = FuelTank::with_level(liters(50.0), liters(5.0)).unwrap();
        assert!(tank.consume(liters(5.0)));
        assert!(tank.is_empty());
    }

    #[test]
    fn headroom_tracks_level() {
        let mut tank = FuelTank::new(liters(50.0)).unwrap();
        assert!(tank.refuel(liters(20.0)));
        assert!((as_liters(tank.headroom()) - 30.0).abs() < 1e-9);
    }

    proptest! {
        /// For any sequence of refuel/consume calls, the level stays
        /// within [0, capacity].
        #[test]
        fn level_always_in_bounds(ops in prop::collection::vec((any::<bool>(), -10.0f64..60.0), 0..64)) {
            let mut tank = FuelTank::new(liters(50.0)).unwrap();
            for (is_refuel, amount) in ops {
                if is_refuel {
                    tank.refuel(liters(amount));
                } else {
                    tank.consume(liters(amount));
                }
                let level = as_liters(tank.level());
                prop_assert!(level >= 0.0);
                prop_assert!(level <= 50.0 + 1e-9);
            }
        }
    }
}
