//! Vehicle orchestrator: owns the powertrain and runs the fixed-step
//! update sequence.

use crate::error::SimResult;
use crate::telemetry::Telemetry;
use dl_components::{Engine, EngineParams, FuelTank, GearCommand, Gearbox, Wheel};
use dl_core::units::{Length, Mass, Power, Volume, as_liters, kg, kw, liters, m};
use tracing::{debug, info, warn};

/// Default simulation step (s).
pub const DEFAULT_DT: f64 = 0.05;

/// Idle contribution to the RPM feedback (RPM).
const RPM_FEEDBACK_BASE: f64 = 800.0;

/// RPM per km/h per unit of gear ratio in the feedback formula.
const RPM_PER_KMH_RATIO: f64 = 25.0;

/// RPM contributed by a fully open throttle in the feedback formula.
const RPM_PER_THROTTLE: f64 = 2000.0;

/// Aerodynamic drag coefficient handed to the wheel while moving.
const DRAG_COEFF: f64 = 0.3;

/// Passive deceleration with the engine off (km/h per tick).
const PASSIVE_DECEL_KMH: f64 = 1.5;

/// Deceleration right after a mid-tick engine stall (km/h per tick).
const STALL_DECEL_KMH: f64 = 5.0;

/// Coast-down decay at closed throttle (km/h per tick), plus the extra
/// applied above the high-speed threshold.
const COAST_DECEL_KMH: f64 = 0.2;
const COAST_DECEL_EXTRA_KMH: f64 = 0.15;
const HIGH_SPEED_KMH: f64 = 80.0;

/// Road-speed gain terms of the empirical acceleration model.
const SPEED_GAIN_TORQUE: f64 = 0.015;
const SPEED_GAIN_THROTTLE: f64 = 0.4;
const SPEED_GAIN_MAX_KMH: f64 = 1.5;

/// Absolute speed ceiling (km/h).
const TOP_SPEED_KMH: f64 = 200.0;

/// Below this the vehicle snaps to a stop when braking (km/h).
const SPEED_SNAP_KMH: f64 = 0.5;

/// Speed regime that still allows engaging reverse (km/h).
const REVERSE_ENGAGE_MAX_KMH: f64 = 5.0;

/// Default command increments.
pub const DEFAULT_THROTTLE_STEP: f64 = 0.02;
pub const DEFAULT_BRAKE_INTENSITY: f64 = 0.15;

/// Construction parameters for a [`Vehicle`].
#[derive(Clone, Debug)]
pub struct VehicleConfig {
    pub tank_capacity: Volume,
    pub initial_fuel: Volume,
    pub max_power: Power,
    pub rpm_max: f64,
    pub wheel_radius: Length,
    pub vehicle_mass: Mass,
    /// Forward gear ratios; reverse is fixed by the gearbox.
    pub gear_ratios: Vec<f64>,
}

impl Default for VehicleConfig {
    /// The stock sedan: 50 L tank (empty), 150 kW, 7000 RPM, 0.30 m
    /// wheels, 1200 kg, five-speed box.
    fn default() -> Self {
        Self {
            tank_capacity: liters(50.0),
            initial_fuel: liters(0.0),
            max_power: kw(150.0),
            rpm_max: 7000.0,
            wheel_radius: m(0.3),
            vehicle_mass: kg(1200.0),
            gear_ratios: dl_components::gearbox::DEFAULT_RATIOS.to_vec(),
        }
    }
}

/// The whole powertrain under a single owner.
///
/// All mutation funnels through this struct: `step` advances the physics
/// at a fixed cadence and the command methods run between steps. Nothing
/// here blocks or shares state, so a consumer that drives it from timer
/// threads only needs one mutex around the `Vehicle` itself.
///
/// `road_speed` (km/h) is the authoritative displayed speed; it advances
/// through the empirical throttle/torque model while the wheel keeps its
/// own physically integrated speed for diagnostics.
#[derive(Clone, Debug)]
pub struct Vehicle {
    tank: FuelTank,
    engine: Engine,
    gearbox: Gearbox,
    wheel: Wheel,
    road_speed: f64,
}

impl Vehicle {
    /// Build a vehicle from a validated configuration.
    pub fn new(config: VehicleConfig) -> SimResult<Self> {
        let tank = FuelTank::with_level(config.tank_capacity, config.initial_fuel)?;
        let engine = Engine::new(EngineParams {
            max_power: config.max_power,
            rpm_max: config.rpm_max,
        })?;
        let gearbox = Gearbox::with_ratios(config.gear_ratios)?;
        let wheel = Wheel::new(config.wheel_radius, config.vehicle_mass)?;
        Ok(Self {
            tank,
            engine,
            gearbox,
            wheel,
            road_speed: 0.0,
        })
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Sequence: age notifications; with the engine off, coast down
    /// passively. Otherwise update the engine (fuel draw, possible
    /// shutoff), feed road speed and throttle back into engine RPM, push
    /// torque through the gearbox into the wheel, reflect engine speed
    /// into wheel speed, then apply drag and coast-down losses.
    pub fn step(&mut self, dt: f64) -> SimResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(crate::error::SimError::InvalidArg {
                what: "dt must be positive",
            });
        }

        self.engine.age_notification();

        if !self.engine.is_running() {
            if self.road_speed > 0.0 {
                self.road_speed = (self.road_speed - PASSIVE_DECEL_KMH).max(0.0);
            }
            return Ok(());
        }

        self.engine.update(&mut self.tank, dt)?;

        if self.engine.is_running() {
            self.feed_back_rpm();

            let wheel_torque = self
                .gearbox
                .transmit(self.engine.torque(), self.engine.is_running());
            self.wheel.apply_torque(wheel_torque)?;

            // Keep the diagnostic wheel speed coupled to the engine.
            if !self.gearbox.is_neutral() {
                self.wheel
                    .set_angular_velocity(self.gearbox.driven_wheel_rpm(self.engine.rpm()));
            }

            if self.road_speed > 0.0 {
                self.wheel.apply_air_resistance(DRAG_COEFF)?;
                if self.engine.throttle() == 0.0 {
                    let mut decel = COAST_DECEL_KMH;
                    if self.road_speed > HIGH_SPEED_KMH {
                        decel += COAST_DECEL_EXTRA_KMH;
                    }
                    self.road_speed = (self.road_speed - decel).max(0.0);
                }
            }
        } else {
            // Engine stalled inside this tick (fuel ran out).
            warn!(road_speed = self.road_speed, "engine stalled mid-step");
            if self.road_speed > 0.0 {
                self.road_speed = (self.road_speed - STALL_DECEL_KMH).max(0.0);
            }
        }

        Ok(())
    }

    /// Recompute engine RPM from road speed, gear ratio and throttle.
    fn feed_back_rpm(&mut self) {
        let ratio = self.gearbox.current_ratio().abs();
        let rpm = RPM_FEEDBACK_BASE
            + self.road_speed * ratio * RPM_PER_KMH_RATIO
            + self.engine.throttle() * RPM_PER_THROTTLE;
        self.engine.set_rpm(rpm.min(self.engine.rpm_max()));
    }

    /// Start the engine. Already running counts as success; a successful
    /// cold start engages first gear.
    pub fn start(&mut self) -> bool {
        if self.engine.is_running() {
            return true;
        }
        if self.tank.is_empty() {
            debug!("start refused: tank empty");
            return false;
        }
        let ok = self.engine.start(&self.tank);
        if ok {
            self.gearbox.shift(GearCommand::Select(0), self.engine.rpm());
            info!("engine started, first gear engaged");
        }
        ok
    }

    /// Shut the engine off and drop into neutral.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.gearbox.shift(GearCommand::Neutral, 0.0);
        info!("engine stopped");
    }

    /// Open the throttle a bit more and advance the empirical speed
    /// model. Refused with the engine off, in neutral, or for a
    /// non-positive increment.
    pub fn throttle_up(&mut self, delta: f64) -> bool {
        if !delta.is_finite() || delta <= 0.0 {
            return false;
        }
        if !self.engine.is_running() || self.gearbox.is_neutral() {
            return false;
        }
        let target = (self.engine.throttle() + delta).min(1.0);
        if !self.engine.set_throttle(target, &self.tank) {
            return false;
        }
        self.advance_road_speed();
        true
    }

    /// The empirical acceleration model: torque through the inverse gear
    /// ratio plus a throttle bonus, capped per call, per gear, and by the
    /// absolute top speed.
    fn advance_road_speed(&mut self) {
        if self.engine.throttle() <= 0.0 || self.gearbox.is_neutral() {
            return;
        }
        let ratio = self.gearbox.current_ratio().abs();
        let gain = self.engine.torque() * (1.0 / ratio) * SPEED_GAIN_TORQUE
            + self.engine.throttle() * SPEED_GAIN_THROTTLE;
        self.road_speed += gain.min(SPEED_GAIN_MAX_KMH);
        self.road_speed = self
            .road_speed
            .min(gear_speed_cap(ratio))
            .min(TOP_SPEED_KMH);
    }

    /// Brake: bleed throttle, scrub road speed, and keep the diagnostic
    /// wheel in sync. Rejected outside `[0, 1]`.
    pub fn brake(&mut self, intensity: f64) -> bool {
        if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
            return false;
        }
        let target = (self.engine.throttle() - intensity).max(0.0);
        // A refused throttle change (dry-tank stall) must not block the
        // brake itself.
        let _ = self.engine.set_throttle(target, &self.tank);
        self.road_speed = (self.road_speed - intensity * 8.0).max(0.0);
        if self.road_speed < SPEED_SNAP_KMH {
            self.road_speed = 0.0;
        }
        self.wheel.brake(intensity);
        true
    }

    pub fn shift_up(&mut self) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        self.gearbox.shift(GearCommand::Up, self.engine.rpm())
    }

    pub fn shift_down(&mut self) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        self.gearbox.shift(GearCommand::Down, self.engine.rpm())
    }

    /// Neutral is always legal.
    pub fn engage_neutral(&mut self) -> bool {
        self.gearbox.shift(GearCommand::Neutral, self.engine.rpm())
    }

    /// Reverse needs a running engine, near-standstill road speed, and
    /// low engine RPM.
    pub fn engage_reverse(&mut self) -> bool {
        if !self.engine.is_running() || self.road_speed > REVERSE_ENGAGE_MAX_KMH {
            return false;
        }
        self.gearbox.shift(GearCommand::Reverse, self.engine.rpm())
    }

    /// Set the throttle position directly.
    pub fn set_throttle(&mut self, value: f64) -> bool {
        self.engine.set_throttle(value, &self.tank)
    }

    pub fn refuel(&mut self, amount: Volume) -> bool {
        self.tank.refuel(amount)
    }

    /// Back to a cold, stationary state (fuel level untouched).
    pub fn reset(&mut self) {
        self.engine.stop();
        self.gearbox.shift(GearCommand::Neutral, 0.0);
        self.wheel.set_angular_velocity(0.0);
        self.road_speed = 0.0;
    }

    /// Displayed road speed (km/h).
    pub fn road_speed(&self) -> f64 {
        self.road_speed
    }

    pub fn tank(&self) -> &FuelTank {
        &self.tank
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn gearbox(&self) -> &Gearbox {
        &self.gearbox
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    /// Snapshot everything a dashboard needs.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            road_speed_kmh: self.road_speed,
            rpm: self.engine.rpm(),
            rpm_percent: self.engine.rpm_percent(),
            gear: self.gearbox.gear_label(),
            torque_nm: self.engine.torque(),
            throttle_percent: self.engine.throttle() * 100.0,
            traction_force_n: self.wheel.traction_force(),
            wheel_speed_kmh: self.wheel.speed_kmh(),
            fuel_level_l: as_liters(self.tank.level()),
            fuel_percent: self.tank.percent_full(),
            fuel_status: self.engine.fuel_status(&self.tank),
            engine_running: self.engine.is_running(),
            in_red_zone: self.engine.in_red_zone(),
            slipping: self.wheel.is_slipping(),
            notification: self.engine.notification().cloned(),
        }
    }
}

/// Per-gear speed ceiling of the empirical model (km/h), keyed by the
/// magnitude of the active ratio.
fn gear_speed_cap(ratio_abs: f64) -> f64 {
    if ratio_abs > 3.0 {
        60.0
    } else if ratio_abs > 2.5 {
        100.0
    } else if ratio_abs > 1.5 {
        140.0
    } else if ratio_abs > 0.9 {
        170.0
    } else {
        200.0
    }
}
