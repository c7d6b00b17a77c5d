//! Fixed-step scenario runner and result recording.

use crate::error::{SimError, SimResult};
use crate::scenario::{EventCursor, Scenario};
use crate::telemetry::Telemetry;
use crate::vehicle::{DEFAULT_DT, Vehicle};

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            t_end: 30.0,
            max_steps: 1_000_000,
            record_every: 10,
        }
    }
}

/// Record of a drive: time points and telemetry frames.
#[derive(Clone, Debug)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// Telemetry snapshots
    pub frames: Vec<Telemetry>,
}

impl SimRecord {
    pub fn last(&self) -> Option<&Telemetry> {
        self.frames.last()
    }

    pub fn max_road_speed(&self) -> f64 {
        self.frames
            .iter()
            .map(|f| f.road_speed_kmh)
            .fold(0.0, f64::max)
    }
}

/// Drive a vehicle through a scenario with a fixed time step.
///
/// Each tick applies the events due at the current time, advances the
/// vehicle by `dt`, and records telemetry every `record_every`-th step.
/// The final state is always recorded.
pub fn run_scenario(
    vehicle: &mut Vehicle,
    scenario: &Scenario,
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    if opts.dt <= 0.0 || !opts.dt.is_finite() {
        return Err(SimError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if opts.t_end < 0.0 {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let mut cursor = EventCursor::new(scenario);
    let mut t = 0.0;

    let mut t_record = vec![t];
    let mut frames = vec![vehicle.telemetry()];

    let mut step = 0;
    while t < opts.t_end && step < opts.max_steps {
        cursor.apply_due(scenario, t, vehicle);
        vehicle.step(opts.dt)?;
        t += opts.dt;
        step += 1;

        if step % opts.record_every == 0 {
            t_record.push(t);
            frames.push(vehicle.telemetry());
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        t_record.push(t);
        frames.push(vehicle.telemetry());
    }

    Ok(SimRecord {
        t: t_record,
        frames,
    })
}
