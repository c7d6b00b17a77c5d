//! Read-only telemetry snapshot for dashboards and exports.

use dl_components::{FuelStatus, Notification};
use serde::Serialize;

/// One frame of vehicle state, safe to hand to a display layer.
///
/// Everything is plain numbers and labels; a consumer polls this instead
/// of reaching into the components. `wheel_speed_kmh` is the physically
/// integrated wheel speed, surfaced for diagnostics next to the
/// authoritative `road_speed_kmh`.
#[derive(Clone, Debug, Serialize)]
pub struct Telemetry {
    pub road_speed_kmh: f64,
    pub rpm: f64,
    pub rpm_percent: f64,
    /// Dashboard gear label: "N", "R", or "1".."5".
    pub gear: String,
    pub torque_nm: f64,
    pub throttle_percent: f64,
    pub traction_force_n: f64,
    pub wheel_speed_kmh: f64,
    pub fuel_level_l: f64,
    pub fuel_percent: f64,
    pub fuel_status: FuelStatus,
    pub engine_running: bool,
    pub in_red_zone: bool,
    pub slipping: bool,
    /// Still-fresh dashboard notification, if any (ttl in ticks).
    pub notification: Option<Notification>,
}
