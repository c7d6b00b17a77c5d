//! Engine model: throttle + RPM in, torque out, fuel drawn per tick.

use crate::common::in_unit_range;
use crate::error::{ComponentError, ComponentResult};
use crate::fuel_tank::FuelTank;
use crate::notify::{Notification, NotificationSlot, Severity};
use dl_core::units::{Power, as_liters, liters, watts};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

/// Torque ceiling for the low-RPM regime (N·m).
const BASE_TORQUE_CAP: f64 = 300.0;

/// Idle speed the engine settles at when started (RPM).
pub const IDLE_RPM: f64 = 800.0;

/// Fuel draw per RPM per second (L).
const FUEL_RATE_RPM: f64 = 0.000015;

/// Fuel draw per N·m per second (L).
const FUEL_RATE_TORQUE: f64 = 0.000008;

/// Default internal resistance torque (N·m).
const DEFAULT_RESISTANCE: f64 = 15.0;

/// Minimum fuel needed to start (L).
const MIN_START_FUEL_L: f64 = 0.1;

/// Fraction of the base torque cap produced while idling.
const IDLE_TORQUE_FRACTION: f64 = 0.08;

/// Fuel percentage below which the reserve warning fires.
const RESERVE_PERCENT: f64 = 15.0;

/// Fuel percentage below which the critical warning fires.
const CRITICAL_PERCENT: f64 = 5.0;

/// Coarse fuel category for the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FuelStatus {
    Normal,
    Reserve,
    Critical,
    Empty,
}

impl fmt::Display for FuelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FuelStatus::Normal => "NORMAL",
            FuelStatus::Reserve => "RESERVE",
            FuelStatus::Critical => "CRITICAL",
            FuelStatus::Empty => "EMPTY",
        };
        f.write_str(label)
    }
}

/// Construction parameters for an [`Engine`].
#[derive(Clone, Copy, Debug)]
pub struct EngineParams {
    /// Peak power output.
    pub max_power: Power,
    /// Maximum safe rotational speed (RPM).
    pub rpm_max: f64,
}

/// Combustion engine.
///
/// ## Torque model
///
/// ```text
/// max_torque(rpm) = min(P_max / ω, 300)        for rpm > 100, else 300
/// raw             = max_torque · throttle · rpm_factor(rpm)
/// net             = raw − (R + 0.3·R·(rpm/rpm_max)²)
/// ```
///
/// `rpm_factor` ramps 0.6→1.0 over the bottom 20 % of the RPM range, is
/// flat at 1.0 through 60 %, then decays linearly above. With the
/// throttle closed and the engine near idle, raw torque is floored at
/// 8 % of the base cap so the engine keeps itself turning.
///
/// The engine does not own the fuel tank; the vehicle passes it into each
/// operation that needs it.
///
/// Invariant: `running == false` implies `rpm == 0` and `torque == 0`.
#[derive(Clone, Debug)]
pub struct Engine {
    rpm: f64,
    torque: f64,
    throttle: f64,
    running: bool,
    max_power: Power,
    rpm_max: f64,
    base_resistance: f64,
    notices: NotificationSlot,
}

impl Engine {
    /// Create a stopped engine.
    ///
    /// # Errors
    /// Returns an error if the peak power is not positive or the RPM
    /// ceiling does not clear the idle speed.
    pub fn new(params: EngineParams) -> ComponentResult<Self> {
        if !params.max_power.value.is_finite() || params.max_power.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "engine max power must be positive",
            });
        }
        if !params.rpm_max.is_finite() || params.rpm_max <= IDLE_RPM {
            return Err(ComponentError::InvalidArg {
                what: "rpm_max must exceed the idle speed",
            });
        }
        Ok(Self {
            rpm: 0.0,
            torque: 0.0,
            throttle: 0.0,
            running: false,
            max_power: params.max_power,
            rpm_max: params.rpm_max,
            base_resistance: DEFAULT_RESISTANCE,
            notices: NotificationSlot::new(),
        })
    }

    /// Override the internal resistance torque (N·m).
    pub fn with_base_resistance(mut self, resistance: f64) -> ComponentResult<Self> {
        if !resistance.is_finite() || resistance < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "base resistance cannot be negative",
            });
        }
        self.base_resistance = resistance;
        Ok(self)
    }

    /// Attempt to start. Requires a non-empty tank holding at least the
    /// minimum start amount. On success the engine settles at idle.
    pub fn start(&mut self, tank: &FuelTank) -> bool {
        if tank.is_empty() {
            self.notices
                .raise("cannot start - tank is empty", Severity::Critical);
            return false;
        }
        if as_liters(tank.level()) < MIN_START_FUEL_L {
            self.notices
                .raise("not enough fuel to start", Severity::Critical);
            return false;
        }
        self.running = true;
        self.rpm = IDLE_RPM;
        self.torque = self.idle_torque();
        self.notices.raise("engine started", Severity::Info);
        true
    }

    /// Shut down, zeroing throttle, RPM and torque.
    pub fn stop(&mut self) {
        self.running = false;
        self.throttle = 0.0;
        self.rpm = 0.0;
        self.torque = 0.0;
    }

    /// Shut down and tell the dashboard about it.
    pub fn stop_with_notice(&mut self) {
        self.stop();
        self.notices.raise("engine stopped", Severity::Info);
    }

    /// Set the throttle position.
    ///
    /// Rejected outside `[0, 1]`. Opening the throttle with an empty tank
    /// forces it back to zero and stalls the engine.
    pub fn set_throttle(&mut self, value: f64, tank: &FuelTank) -> bool {
        if !in_unit_range(value) {
            return false;
        }
        if value > 0.0 && tank.is_empty() {
            self.notices
                .raise("cannot accelerate - no fuel", Severity::Warning);
            self.stop();
            return false;
        }
        self.throttle = value;
        true
    }

    /// Set the rotational speed directly (the orchestrator's feedback
    /// path). Rejected outside `[0, rpm_max]`. Recomputes torque while
    /// running and warns when the redline region is entered.
    pub fn set_rpm(&mut self, rpm: f64) -> bool {
        if !rpm.is_finite() || rpm < 0.0 || rpm > self.rpm_max {
            return false;
        }
        self.rpm = rpm;
        if self.running {
            self.torque = self.generate_torque();
            if rpm > self.rpm_max * 0.9 {
                self.notices
                    .raise("engine at redline", Severity::Warning);
            }
        }
        true
    }

    /// Advance the engine by one tick: generate torque, draw fuel, and
    /// cascade a shutdown when the tank runs dry.
    ///
    /// # Errors
    /// Returns an error if `dt` is not a positive, finite step.
    pub fn update(&mut self, tank: &mut FuelTank, dt: f64) -> ComponentResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "dt must be positive",
            });
        }

        if tank.is_empty() {
            if self.running {
                self.notices
                    .raise("engine stopped - fuel exhausted", Severity::Critical);
            }
            self.stop();
            return Ok(());
        }

        if !self.running {
            self.rpm = 0.0;
            self.torque = 0.0;
            return Ok(());
        }

        self.torque = self.generate_torque();

        let burned = (self.rpm * FUEL_RATE_RPM + self.torque * FUEL_RATE_TORQUE) * dt;
        let consumed = tank.consume(liters(burned));
        if !consumed || tank.is_empty() {
            self.notices
                .raise("engine stopped - insufficient fuel", Severity::Critical);
            self.stop();
            return Ok(());
        }

        self.check_fuel_levels(tank);
        Ok(())
    }

    /// Raise at most one fuel-level notice per call; the most severe
    /// threshold wins.
    fn check_fuel_levels(&mut self, tank: &FuelTank) {
        let pct = tank.percent_full();
        if pct <= CRITICAL_PERCENT && pct > 0.0 {
            self.notices
                .raise(format!("fuel critical ({pct:.1}%)"), Severity::Critical);
        } else if pct <= RESERVE_PERCENT {
            self.notices
                .raise(format!("fuel reserve ({pct:.1}%)"), Severity::Warning);
        }
    }

    /// Net torque at the current throttle and RPM (N·m, floored at 0).
    pub fn generate_torque(&self) -> f64 {
        if !self.running || self.rpm <= 0.0 {
            return 0.0;
        }

        let mut raw = self.max_torque() * self.throttle * self.rpm_factor();

        // Closed throttle near idle still produces enough torque to keep
        // the engine turning.
        if self.throttle == 0.0 && self.rpm <= IDLE_RPM * 1.2 {
            raw = self.idle_torque();
        }

        (raw - self.resistance_torque()).max(0.0)
    }

    /// Power-limited torque ceiling: τ = P/ω above 100 RPM, capped at the
    /// base value.
    fn max_torque(&self) -> f64 {
        if self.rpm > 100.0 {
            let omega = 2.0 * PI * self.rpm / 60.0;
            (self.max_power.value / omega).min(BASE_TORQUE_CAP)
        } else {
            BASE_TORQUE_CAP
        }
    }

    /// Normalized torque curve over the RPM range.
    fn rpm_factor(&self) -> f64 {
        let n = self.rpm / self.rpm_max;
        if n < 0.2 {
            0.6 + (n / 0.2) * 0.4
        } else if n < 0.6 {
            1.0
        } else {
            1.0 - (n - 0.6) * 0.4
        }
    }

    fn idle_torque(&self) -> f64 {
        BASE_TORQUE_CAP * IDLE_TORQUE_FRACTION
    }

    /// Internal friction and pumping losses, growing with the square of
    /// normalized RPM.
    fn resistance_torque(&self) -> f64 {
        let n = self.rpm / self.rpm_max;
        self.base_resistance + self.base_resistance * 0.3 * n * n
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    pub fn rpm_max(&self) -> f64 {
        self.rpm_max
    }

    pub fn torque(&self) -> f64 {
        self.torque
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn base_resistance(&self) -> f64 {
        self.base_resistance
    }

    /// Instantaneous power output, τ·ω.
    pub fn power(&self) -> Power {
        if self.rpm > 0.0 {
            let omega = 2.0 * PI * self.rpm / 60.0;
            watts(self.torque * omega)
        } else {
            watts(0.0)
        }
    }

    pub fn rpm_percent(&self) -> f64 {
        self.rpm / self.rpm_max * 100.0
    }

    /// True above 85 % of the RPM ceiling.
    pub fn in_red_zone(&self) -> bool {
        self.rpm > self.rpm_max * 0.85
    }

    /// True at 95 % of the RPM ceiling or beyond.
    pub fn at_limit(&self) -> bool {
        self.rpm >= self.rpm_max * 0.95
    }

    pub fn is_accelerating(&self) -> bool {
        self.throttle > 0.1
    }

    /// Current fuel draw rate (L/s); zero when stopped.
    pub fn instantaneous_consumption(&self) -> f64 {
        if !self.running {
            return 0.0;
        }
        self.rpm * FUEL_RATE_RPM + self.torque * FUEL_RATE_TORQUE
    }

    pub fn fuel_status(&self, tank: &FuelTank) -> FuelStatus {
        if tank.is_empty() {
            FuelStatus::Empty
        } else if tank.percent_full() <= CRITICAL_PERCENT {
            FuelStatus::Critical
        } else if tank.percent_full() <= RESERVE_PERCENT {
            FuelStatus::Reserve
        } else {
            FuelStatus::Normal
        }
    }

    /// The currently visible dashboard notification, if any.
    pub fn notification(&self) -> Option<&Notification> {
        self.notices.current()
    }

    pub fn clear_notification(&mut self) {
        self.notices.clear();
    }

    /// Age the notification slot by one tick. Called once per simulation
    /// step by the orchestrator, whether or not the engine is running.
    pub fn age_notification(&mut self) {
        self.notices.tick();
    }
}
