use clap::{Parser, Subcommand};
use dl_sim::{
    Scenario, SimError, SimOptions, SimRecord, SimResult, Vehicle, VehicleConfig, run_scenario,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dl-cli")]
#[command(about = "Driveline CLI - vehicle powertrain simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a drive scenario file
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Run a drive scenario and report telemetry
    Drive {
        /// Path to the scenario YAML file (built-in demo when omitted)
        scenario_path: Option<PathBuf>,
        /// Time step in seconds
        #[arg(long, default_value_t = dl_sim::DEFAULT_DT)]
        dt: f64,
        /// End time in seconds (defaults to the scenario's last event + 5 s)
        #[arg(long)]
        t_end: Option<f64>,
        /// Record every N-th step
        #[arg(long, default_value_t = 10)]
        record_every: usize,
        /// Write the recorded telemetry as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the final telemetry frame as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> SimResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Drive {
            scenario_path,
            dt,
            t_end,
            record_every,
            csv,
            json,
        } => cmd_drive(scenario_path.as_deref(), dt, t_end, record_every, csv, json),
    }
}

fn cmd_validate(path: &Path) -> SimResult<()> {
    let scenario = Scenario::from_path(path)?;
    println!("Scenario '{}' is valid.", scenario.name);
    println!("  events:   {}", scenario.events.len());
    println!("  last at:  {:.2} s", scenario.end_time());
    if scenario.vehicle.is_some() {
        println!("  vehicle:  custom overrides");
    } else {
        println!("  vehicle:  stock configuration");
    }
    Ok(())
}

fn cmd_drive(
    path: Option<&Path>,
    dt: f64,
    t_end: Option<f64>,
    record_every: usize,
    csv: Option<PathBuf>,
    json: bool,
) -> SimResult<()> {
    let scenario = match path {
        Some(p) => Scenario::from_path(p)?,
        None => Scenario::demo(),
    };

    let config = scenario
        .vehicle
        .as_ref()
        .map(|ov| ov.to_config())
        .unwrap_or_else(VehicleConfig::default);
    let mut vehicle = Vehicle::new(config)?;

    let opts = SimOptions {
        dt,
        t_end: t_end.unwrap_or_else(|| scenario.end_time() + 5.0),
        record_every,
        ..SimOptions::default()
    };

    let record = run_scenario(&mut vehicle, &scenario, &opts)?;

    if let Some(csv_path) = csv {
        let mut file = File::create(&csv_path)?;
        write_csv(&mut file, &record)?;
        println!("Wrote {} frames to {}", record.frames.len(), csv_path.display());
    }

    if json {
        let last = record.last().ok_or(SimError::InvalidArg {
            what: "empty record",
        })?;
        let text = serde_json::to_string_pretty(last).map_err(|e| SimError::Scenario {
            message: format!("telemetry serialization failed: {e}"),
        })?;
        println!("{text}");
        return Ok(());
    }

    print_summary(&scenario, &record);
    Ok(())
}

fn print_summary(scenario: &Scenario, record: &SimRecord) {
    let last = match record.last() {
        Some(frame) => frame,
        None => return,
    };

    println!("=== {} ===", scenario.name);
    println!(
        "simulated:   {:.2} s ({} frames recorded)",
        record.t.last().copied().unwrap_or(0.0),
        record.frames.len()
    );
    println!("peak speed:  {:.1} km/h", record.max_road_speed());
    println!(
        "fuel:        {:.2} L remaining ({})",
        last.fuel_level_l, last.fuel_status
    );
    println!(
        "final state: {} | gear {} | {:.1} km/h | {:.0} RPM",
        if last.engine_running { "running" } else { "off" },
        last.gear,
        last.road_speed_kmh,
        last.rpm
    );
    if let Some(n) = &last.notification {
        println!("notice:      [{}] {}", n.severity, n.message);
    }
}

fn write_csv(out: &mut dyn Write, record: &SimRecord) -> io::Result<()> {
    writeln!(
        out,
        "t,road_speed_kmh,rpm,gear,torque_nm,throttle_percent,traction_force_n,wheel_speed_kmh,fuel_level_l,engine_running"
    )?;
    for (t, frame) in record.t.iter().zip(record.frames.iter()) {
        writeln!(
            out,
            "{:.3},{:.3},{:.1},{},{:.3},{:.1},{:.1},{:.3},{:.4},{}",
            t,
            frame.road_speed_kmh,
            frame.rpm,
            frame.gear,
            frame.torque_nm,
            frame.throttle_percent,
            frame.traction_force_n,
            frame.wheel_speed_kmh,
            frame.fuel_level_l,
            frame.engine_running
        )?;
    }
    Ok(())
}
