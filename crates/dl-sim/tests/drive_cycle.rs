//! Integration test: a full drive cycle through the gears.

use dl_sim::{Scenario, SimOptions, Vehicle, run_scenario};

#[test]
fn acceleration_run_climbs_through_gears() {
    let text = r#"
name: acceleration run
vehicle:
  initial_fuel_l: 40.0
events:
  - { at: 0.0, command: start }
  - { at: 0.5, until: 30.0, command: { throttle_up: { delta: 0.05 } } }
  - { at: 5.0, command: shift_up }
  - { at: 10.0, command: shift_up }
  - { at: 15.0, command: shift_up }
  - { at: 20.0, command: shift_up }
"#;
    let scenario = Scenario::from_str(text).unwrap();
    let mut vehicle = Vehicle::new(scenario.vehicle.as_ref().unwrap().to_config()).unwrap();

    let opts = SimOptions {
        dt: 0.05,
        t_end: 30.0,
        record_every: 20,
        ..SimOptions::default()
    };
    let record = run_scenario(&mut vehicle, &scenario, &opts).unwrap();

    // Past first gear's 60 km/h cap once the taller gears engage.
    assert!(record.max_road_speed() > 60.0);

    let last = record.last().unwrap();
    assert!(last.engine_running);
    assert_eq!(last.gear, "5");
    assert!(last.fuel_level_l < 40.0);
    assert!(last.wheel_speed_kmh > 0.0);

    // Invariants hold on every recorded frame.
    for frame in &record.frames {
        assert!(frame.road_speed_kmh >= 0.0);
        assert!(frame.road_speed_kmh <= 200.0);
        assert!(frame.rpm >= 0.0);
        assert!(frame.rpm_percent <= 100.0 + 1e-9);
        assert!(frame.fuel_level_l >= 0.0);
        if !frame.engine_running {
            assert_eq!(frame.rpm, 0.0);
            assert_eq!(frame.torque_nm, 0.0);
        }
    }
}

#[test]
fn gear_caps_limit_speed_in_first() {
    let text = r#"
name: stuck in first
vehicle:
  initial_fuel_l: 40.0
events:
  - { at: 0.0, command: start }
  - { at: 0.5, until: 30.0, command: { throttle_up: { delta: 0.05 } } }
"#;
    let scenario = Scenario::from_str(text).unwrap();
    let mut vehicle = Vehicle::new(scenario.vehicle.as_ref().unwrap().to_config()).unwrap();

    let record = run_scenario(&mut vehicle, &scenario, &SimOptions::default()).unwrap();
    assert!(record.max_road_speed() > 30.0);
    assert!(record.max_road_speed() <= 60.0);
}

#[test]
fn braking_window_brings_vehicle_to_rest() {
    let text = r#"
name: accelerate then brake
vehicle:
  initial_fuel_l: 40.0
events:
  - { at: 0.0, command: start }
  - { at: 0.5, until: 10.0, command: { throttle_up: { delta: 0.05 } } }
  - { at: 10.0, until: 25.0, command: { brake: {} } }
"#;
    let scenario = Scenario::from_str(text).unwrap();
    let mut vehicle = Vehicle::new(scenario.vehicle.as_ref().unwrap().to_config()).unwrap();

    let opts = SimOptions {
        t_end: 26.0,
        ..SimOptions::default()
    };
    let record = run_scenario(&mut vehicle, &scenario, &opts).unwrap();

    assert!(record.max_road_speed() > 10.0);
    let last = record.last().unwrap();
    assert_eq!(last.road_speed_kmh, 0.0);
    assert_eq!(last.throttle_percent, 0.0);
}
