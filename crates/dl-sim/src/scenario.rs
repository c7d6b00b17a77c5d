//! Drive scenarios: timed command scripts loaded from YAML.
//!
//! A scenario is what a driver at the controls would do, expressed as
//! data. One-shot events fire once when their time arrives; events with
//! an `until` window are re-applied every tick inside the window, which
//! is how held buttons (continuous throttle, continuous brake) are
//! modeled.

use crate::error::{SimError, SimResult};
use crate::vehicle::{
    DEFAULT_BRAKE_INTENSITY, DEFAULT_THROTTLE_STEP, Vehicle, VehicleConfig,
};
use dl_core::units::{kg, kw, liters, m};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A driver command, as it appears in scenario files.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Stop,
    ThrottleUp {
        #[serde(default = "default_throttle_step")]
        delta: f64,
    },
    Brake {
        #[serde(default = "default_brake_intensity")]
        intensity: f64,
    },
    SetThrottle {
        value: f64,
    },
    ShiftUp,
    ShiftDown,
    Neutral,
    Reverse,
    Refuel {
        liters: f64,
    },
}

fn default_throttle_step() -> f64 {
    DEFAULT_THROTTLE_STEP
}

fn default_brake_intensity() -> f64 {
    DEFAULT_BRAKE_INTENSITY
}

impl Command {
    /// Apply to a vehicle. Commands are best-effort, like button presses:
    /// an illegal one reports `false` and changes nothing.
    pub fn apply(&self, vehicle: &mut Vehicle) -> bool {
        match *self {
            Command::Start => vehicle.start(),
            Command::Stop => {
                vehicle.stop();
                true
            }
            Command::ThrottleUp { delta } => vehicle.throttle_up(delta),
            Command::Brake { intensity } => vehicle.brake(intensity),
            Command::SetThrottle { value } => vehicle.set_throttle(value),
            Command::ShiftUp => vehicle.shift_up(),
            Command::ShiftDown => vehicle.shift_down(),
            Command::Neutral => vehicle.engage_neutral(),
            Command::Reverse => vehicle.engage_reverse(),
            Command::Refuel { liters: amount } => vehicle.refuel(liters(amount)),
        }
    }
}

/// One scripted event.
#[derive(Clone, Debug, Deserialize)]
pub struct Event {
    /// Simulation time the event fires (s).
    pub at: f64,
    /// End of the re-apply window (s); absent for one-shot events.
    #[serde(default)]
    pub until: Option<f64>,
    pub command: Command,
}

/// Vehicle parameter overrides in plain units, as written in YAML.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleOverrides {
    pub tank_capacity_l: Option<f64>,
    pub initial_fuel_l: Option<f64>,
    pub max_power_kw: Option<f64>,
    pub rpm_max: Option<f64>,
    pub wheel_radius_m: Option<f64>,
    pub vehicle_mass_kg: Option<f64>,
    pub gear_ratios: Option<Vec<f64>>,
}

impl VehicleOverrides {
    /// Merge over the stock configuration.
    pub fn to_config(&self) -> VehicleConfig {
        let base = VehicleConfig::default();
        VehicleConfig {
            tank_capacity: self.tank_capacity_l.map(liters).unwrap_or(base.tank_capacity),
            initial_fuel: self.initial_fuel_l.map(liters).unwrap_or(base.initial_fuel),
            max_power: self.max_power_kw.map(kw).unwrap_or(base.max_power),
            rpm_max: self.rpm_max.unwrap_or(base.rpm_max),
            wheel_radius: self.wheel_radius_m.map(m).unwrap_or(base.wheel_radius),
            vehicle_mass: self.vehicle_mass_kg.map(kg).unwrap_or(base.vehicle_mass),
            gear_ratios: self.gear_ratios.clone().unwrap_or(base.gear_ratios),
        }
    }
}

/// A named drive script plus optional vehicle overrides.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub vehicle: Option<VehicleOverrides>,
    pub events: Vec<Event>,
}

impl Scenario {
    /// Parse a scenario from YAML text and validate it.
    pub fn from_str(text: &str) -> SimResult<Self> {
        let mut scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        scenario
            .events
            .sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(scenario)
    }

    /// Load a scenario file.
    pub fn from_path(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    fn validate(&self) -> SimResult<()> {
        for event in &self.events {
            if !event.at.is_finite() || event.at < 0.0 {
                return Err(SimError::Scenario {
                    message: format!("event time {} is not a valid instant", event.at),
                });
            }
            if let Some(until) = event.until {
                if !until.is_finite() || until <= event.at {
                    return Err(SimError::Scenario {
                        message: format!(
                            "event window [{}, {}) is empty or invalid",
                            event.at, until
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Time of the last scripted action (s).
    pub fn end_time(&self) -> f64 {
        self.events
            .iter()
            .map(|e| e.until.unwrap_or(e.at))
            .fold(0.0, f64::max)
    }

    /// Built-in demo drive: refuel, start, accelerate up through the
    /// gears, brake back down, stop.
    pub fn demo() -> Self {
        let text = r#"
name: demo drive
events:
  - { at: 0.0, command: { refuel: { liters: 30.0 } } }
  - { at: 0.5, command: start }
  - { at: 1.0, until: 20.0, command: { throttle_up: {} } }
  - { at: 6.0, command: shift_up }
  - { at: 10.0, command: shift_up }
  - { at: 14.0, command: shift_up }
  - { at: 20.0, until: 26.0, command: { brake: {} } }
  - { at: 28.0, command: stop }
"#;
        Self::from_str(text).expect("built-in demo scenario must parse")
    }
}

/// Tracks which one-shot events have already fired during a run.
pub(crate) struct EventCursor {
    fired: Vec<bool>,
}

impl EventCursor {
    pub(crate) fn new(scenario: &Scenario) -> Self {
        Self {
            fired: vec![false; scenario.events.len()],
        }
    }

    /// Apply every event due at time `t`.
    pub(crate) fn apply_due(&mut self, scenario: &Scenario, t: f64, vehicle: &mut Vehicle) {
        for (i, event) in scenario.events.iter().enumerate() {
            let due = match event.until {
                Some(until) => t >= event.at && t < until,
                None => !self.fired[i] && t >= event.at,
            };
            if due {
                self.fired[i] = true;
                if !event.command.apply(vehicle) {
                    debug!(t, command = ?event.command, "scenario command refused");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml() {
        let text = r#"
name: smoke
events:
  - { at: 0.0, command: { refuel: { liters: 10.0 } } }
  - { at: 0.5, command: start }
  - { at: 1.0, until: 2.0, command: { throttle_up: { delta: 0.05 } } }
"#;
        let s = Scenario::from_str(text).unwrap();
        assert_eq!(s.name, "smoke");
        assert_eq!(s.events.len(), 3);
        assert_eq!(s.events[1].command, Command::Start);
        assert_eq!(
            s.events[2].command,
            Command::ThrottleUp { delta: 0.05 }
        );
        assert!((s.end_time() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn throttle_up_defaults_its_delta() {
        let text = r#"
name: defaults
events:
  - { at: 0.0, command: { throttle_up: {} } }
"#;
        let s = Scenario::from_str(text).unwrap();
        assert_eq!(
            s.events[0].command,
            Command::ThrottleUp {
                delta: DEFAULT_THROTTLE_STEP
            }
        );
    }

    #[test]
    fn rejects_negative_time_and_empty_window() {
        let bad_time = r#"
name: bad
events:
  - { at: -1.0, command: start }
"#;
        assert!(Scenario::from_str(bad_time).is_err());

        let bad_window = r#"
name: bad
events:
  - { at: 2.0, until: 2.0, command: { throttle_up: {} } }
"#;
        assert!(Scenario::from_str(bad_window).is_err());
    }

    #[test]
    fn events_sorted_by_time() {
        let text = r#"
name: unsorted
events:
  - { at: 5.0, command: stop }
  - { at: 0.0, command: start }
"#;
        let s = Scenario::from_str(text).unwrap();
        assert_eq!(s.events[0].command, Command::Start);
    }

    #[test]
    fn vehicle_overrides_merge() {
        let text = r#"
name: custom
vehicle:
  initial_fuel_l: 20.0
  rpm_max: 6500.0
events:
  - { at: 0.0, command: start }
"#;
        let s = Scenario::from_str(text).unwrap();
        let config = s.vehicle.as_ref().unwrap().to_config();
        assert_eq!(config.rpm_max, 6500.0);
        // Untouched fields keep stock values.
        assert_eq!(config.gear_ratios.len(), 5);
    }

    #[test]
    fn demo_scenario_parses() {
        let s = Scenario::demo();
        assert!(!s.events.is_empty());
        assert!(s.end_time() > 20.0);
    }
}
