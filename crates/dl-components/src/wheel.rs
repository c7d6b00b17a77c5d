//! Wheel dynamics: torque in, traction force and speed out.

use crate::common::{check_finite, clamp, in_unit_range};
use crate::error::{ComponentError, ComponentResult};
use dl_core::units::constants::{G_MPS2, MPS_TO_KMH};
use dl_core::units::{Length, Mass};
use std::f64::consts::PI;

/// Default tire/asphalt friction coefficient.
const DEFAULT_FRICTION_COEFF: f64 = 0.7;

/// Simplified inertia factor; the effective rotational inertia is this
/// fraction of the vehicle mass.
const INERTIA_FACTOR: f64 = 0.5;

/// Rolling resistance coefficient.
const ROLLING_RESISTANCE: f64 = 0.015;

/// rad/s² to RPM-per-step conversion used by the integration.
const RAD_S2_TO_RPM: f64 = 9.55;

/// Fraction of the inertia term through which aerodynamic drag bleeds
/// angular velocity.
const DRAG_BLEED: f64 = 0.1;

/// Single driven wheel carrying the whole vehicle's load.
///
/// ## Model
///
/// ```text
/// traction   = clamp(τ / r, ±μ·m·g)
/// τ_rolling  = 0.015 · m · g · r
/// dω/dt      = (τ − τ_rolling) / (0.5·m)
/// v          = 2π · r · (ω / 60)        (ω kept in RPM)
/// ```
///
/// Angular velocity never goes negative, and the linear velocity is
/// recomputed after every angular-velocity change rather than stored
/// independently.
#[derive(Clone, Debug)]
pub struct Wheel {
    radius: Length,
    mass: Mass,
    friction_coeff: f64,
    angular_velocity: f64,
    linear_velocity: f64,
    torque_received: f64,
    traction_force: f64,
}

impl Wheel {
    /// Create a stationary wheel.
    ///
    /// # Errors
    /// Returns an error if the radius or carried mass is not positive.
    pub fn new(radius: Length, mass: Mass) -> ComponentResult<Self> {
        if !radius.value.is_finite() || radius.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "wheel radius must be positive",
            });
        }
        if !mass.value.is_finite() || mass.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "vehicle mass must be positive",
            });
        }
        Ok(Self {
            radius,
            mass,
            friction_coeff: DEFAULT_FRICTION_COEFF,
            angular_velocity: 0.0,
            linear_velocity: 0.0,
            torque_received: 0.0,
            traction_force: 0.0,
        })
    }

    /// Override the friction coefficient. Rejected outside `[0, 1]`.
    pub fn set_friction_coeff(&mut self, coeff: f64) -> bool {
        if in_unit_range(coeff) {
            self.friction_coeff = coeff;
            true
        } else {
            false
        }
    }

    /// Set the angular velocity directly (RPM), recomputing the linear
    /// velocity. Rejected for negative or non-finite values.
    pub fn set_angular_velocity(&mut self, rpm: f64) -> bool {
        if rpm.is_finite() && rpm >= 0.0 {
            self.angular_velocity = rpm;
            self.recompute_linear_velocity();
            true
        } else {
            false
        }
    }

    /// Receive drive torque (N·m, negative in reverse): derive the
    /// traction force under the friction limit and integrate angular
    /// velocity against rolling resistance.
    ///
    /// # Errors
    /// Returns an error if the torque is not finite.
    pub fn apply_torque(&mut self, torque: f64) -> ComponentResult<()> {
        check_finite(torque, "wheel drive torque")?;
        self.torque_received = torque;

        let limit = self.friction_limit();
        self.traction_force = clamp(torque / self.radius.value, -limit, limit);

        let net_torque = torque - self.rolling_resistance_torque();
        let angular_accel = net_torque / (INERTIA_FACTOR * self.mass.value);
        self.angular_velocity = (self.angular_velocity + angular_accel * RAD_S2_TO_RPM).max(0.0);

        self.recompute_linear_velocity();
        Ok(())
    }

    /// Bleed speed against aerodynamic drag, which grows with the square
    /// of the linear velocity.
    ///
    /// # Errors
    /// Returns an error if the drag coefficient is not finite.
    pub fn apply_air_resistance(&mut self, drag_coeff: f64) -> ComponentResult<()> {
        check_finite(drag_coeff, "drag coefficient")?;
        let drag_force = drag_coeff * self.linear_velocity * self.linear_velocity;
        let drag_torque = drag_force * self.radius.value;
        let rpm_reduction = drag_torque / (INERTIA_FACTOR * self.mass.value) * DRAG_BLEED;
        self.angular_velocity = (self.angular_velocity - rpm_reduction).max(0.0);
        self.recompute_linear_velocity();
        Ok(())
    }

    /// Scrub off speed proportionally to brake intensity. Rejected
    /// outside `[0, 1]`.
    pub fn brake(&mut self, intensity: f64) -> bool {
        if !in_unit_range(intensity) {
            return false;
        }
        let reduction = self.angular_velocity * intensity * 0.1;
        self.angular_velocity = (self.angular_velocity - reduction).max(0.0);
        self.recompute_linear_velocity();
        true
    }

    fn recompute_linear_velocity(&mut self) {
        self.linear_velocity = 2.0 * PI * self.radius.value * (self.angular_velocity / 60.0);
    }

    /// Maximum traction force the contact patch can carry (N).
    pub fn friction_limit(&self) -> f64 {
        self.friction_coeff * self.mass.value * G_MPS2
    }

    fn rolling_resistance_torque(&self) -> f64 {
        ROLLING_RESISTANCE * self.mass.value * G_MPS2 * self.radius.value
    }

    /// True when traction is up against the friction limit.
    pub fn is_slipping(&self) -> bool {
        self.traction_force > self.friction_limit() * 0.95
    }

    pub fn radius(&self) -> Length {
        self.radius
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn friction_coeff(&self) -> f64 {
        self.friction_coeff
    }

    /// Angular velocity in RPM.
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Linear velocity at the rim (m/s).
    pub fn linear_velocity(&self) -> f64 {
        self.linear_velocity
    }

    pub fn torque_received(&self) -> f64 {
        self.torque_received
    }

    /// Traction force at the contact patch (N, signed).
    pub fn traction_force(&self) -> f64 {
        self.traction_force
    }

    pub fn speed_kmh(&self) -> f64 {
        self.linear_velocity * MPS_TO_KMH
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius.value
    }
}
