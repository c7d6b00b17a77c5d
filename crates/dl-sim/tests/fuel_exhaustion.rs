//! Integration test: running the tank dry cascades to a safe stop, and
//! refueling recovers.

use dl_core::units::liters;
use dl_sim::{DEFAULT_DT, DEFAULT_THROTTLE_STEP, Scenario, SimOptions, Vehicle, VehicleConfig, run_scenario};

fn low_fuel_vehicle() -> Vehicle {
    let config = VehicleConfig {
        initial_fuel: liters(0.5),
        ..VehicleConfig::default()
    };
    Vehicle::new(config).unwrap()
}

#[test]
fn running_dry_stops_engine_and_vehicle_coasts_to_rest() {
    let mut vehicle = low_fuel_vehicle();
    assert!(vehicle.start());

    // Hold the throttle open until the tank runs dry.
    let mut stalled_at_speed = 0.0;
    for _ in 0..200_000 {
        vehicle.throttle_up(DEFAULT_THROTTLE_STEP);
        vehicle.step(DEFAULT_DT).unwrap();
        if !vehicle.engine().is_running() {
            stalled_at_speed = vehicle.road_speed();
            break;
        }
    }
    assert!(!vehicle.engine().is_running());
    assert!(stalled_at_speed > 0.0);
    assert_eq!(vehicle.engine().rpm(), 0.0);
    assert_eq!(vehicle.engine().torque(), 0.0);

    // Throttle is refused now, and the vehicle coasts down to a stop.
    assert!(!vehicle.throttle_up(DEFAULT_THROTTLE_STEP));
    for _ in 0..10_000 {
        vehicle.step(DEFAULT_DT).unwrap();
        if vehicle.road_speed() == 0.0 {
            break;
        }
    }
    assert_eq!(vehicle.road_speed(), 0.0);
}

#[test]
fn refuel_and_restart_recovers() {
    let mut vehicle = low_fuel_vehicle();
    vehicle.start();
    for _ in 0..200_000 {
        vehicle.throttle_up(DEFAULT_THROTTLE_STEP);
        vehicle.step(DEFAULT_DT).unwrap();
        if !vehicle.engine().is_running() {
            break;
        }
    }
    assert!(!vehicle.engine().is_running());
    assert!(!vehicle.start()); // still dry

    assert!(vehicle.refuel(liters(10.0)));
    assert!(vehicle.start());
    assert!(vehicle.engine().is_running());
    assert_eq!(vehicle.telemetry().gear, "1");
}

#[test]
fn scenario_with_mid_run_refuel_keeps_driving() {
    let text = r#"
name: splash and dash
vehicle:
  initial_fuel_l: 1.0
events:
  - { at: 0.0, command: start }
  - { at: 0.5, until: 40.0, command: { throttle_up: { delta: 0.05 } } }
  - { at: 20.0, command: { refuel: { liters: 20.0 } } }
  - { at: 20.5, command: start }
"#;
    let scenario = Scenario::from_str(text).unwrap();
    let mut vehicle = Vehicle::new(scenario.vehicle.as_ref().unwrap().to_config()).unwrap();

    let opts = SimOptions {
        t_end: 40.0,
        ..SimOptions::default()
    };
    let record = run_scenario(&mut vehicle, &scenario, &opts).unwrap();

    // The restart after refueling leaves the engine running at the end.
    let last = record.last().unwrap();
    assert!(last.engine_running);
    assert!(last.fuel_level_l > 0.0);
}
