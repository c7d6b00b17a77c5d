//! Gearbox: discrete ratios, shift legality, torque transmission.

use crate::error::{ComponentError, ComponentResult};
use serde::Serialize;

/// Default forward ratios, first to fifth.
pub const DEFAULT_RATIOS: [f64; 5] = [3.5, 2.0, 1.3, 1.0, 0.8];

/// Fixed reverse ratio, independent of the forward ratio set. Negative so
/// the sign rides along with transmitted torque.
pub const REVERSE_RATIO: f64 = -3.0;

/// Fraction of engine torque surviving the transmission.
pub const TRANSMISSION_EFFICIENCY: f64 = 0.95;

/// Engine speed above which reverse refuses to engage (RPM).
const REVERSE_ENGAGE_RPM_MAX: f64 = 1000.0;

/// Which gear the box is in.
///
/// `Forward(i)` indexes the ratio table, so first gear is `Forward(0)`.
/// Reverse is its own variant rather than an aliased forward index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GearState {
    Neutral,
    Forward(usize),
    Reverse,
}

/// A shift request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GearCommand {
    Up,
    Down,
    Neutral,
    Reverse,
    /// Select a forward gear by index (0-based).
    Select(usize),
}

/// Manual gearbox with a validated ratio table.
#[derive(Clone, Debug)]
pub struct Gearbox {
    ratios: Vec<f64>,
    state: GearState,
}

impl Default for Gearbox {
    fn default() -> Self {
        Self {
            ratios: DEFAULT_RATIOS.to_vec(),
            state: GearState::Neutral,
        }
    }
}

impl Gearbox {
    /// Gearbox with the default five-speed ratio set, in neutral.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gearbox with a custom forward ratio set.
    ///
    /// # Errors
    /// Returns an error if the set is empty or contains a non-positive or
    /// non-finite ratio. The reverse ratio is fixed and not part of the
    /// table.
    pub fn with_ratios(ratios: Vec<f64>) -> ComponentResult<Self> {
        if ratios.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "ratio set cannot be empty",
            });
        }
        if ratios.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "forward ratios must be positive",
            });
        }
        Ok(Self {
            ratios,
            state: GearState::Neutral,
        })
    }

    /// Apply a shift request. Returns `false` (state unchanged) when the
    /// request is illegal from the current state.
    ///
    /// `engine_rpm` gates reverse: engaging it is only legal below
    /// 1000 RPM.
    pub fn shift(&mut self, cmd: GearCommand, engine_rpm: f64) -> bool {
        match cmd {
            GearCommand::Select(index) => {
                if index < self.ratios.len() {
                    self.state = GearState::Forward(index);
                    true
                } else {
                    false
                }
            }
            GearCommand::Neutral => {
                self.state = GearState::Neutral;
                true
            }
            GearCommand::Up => match self.state {
                GearState::Neutral | GearState::Reverse => {
                    self.state = GearState::Forward(0);
                    true
                }
                GearState::Forward(i) => {
                    if i + 1 < self.ratios.len() {
                        self.state = GearState::Forward(i + 1);
                        true
                    } else {
                        false
                    }
                }
            },
            GearCommand::Down => match self.state {
                GearState::Forward(i) if i > 0 => {
                    self.state = GearState::Forward(i - 1);
                    true
                }
                _ => false,
            },
            GearCommand::Reverse => {
                if engine_rpm < REVERSE_ENGAGE_RPM_MAX {
                    self.state = GearState::Reverse;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// The active ratio: 0 in neutral, −3 in reverse, the table entry in a
    /// forward gear.
    pub fn current_ratio(&self) -> f64 {
        match self.state {
            GearState::Neutral => 0.0,
            GearState::Reverse => REVERSE_RATIO,
            GearState::Forward(i) => self.ratios[i],
        }
    }

    /// Torque delivered to the wheel this tick (N·m).
    ///
    /// Zero when the engine is off or the box is in neutral; otherwise
    /// `τ · |ratio| · η`, negated in reverse.
    pub fn transmit(&self, engine_torque: f64, engine_running: bool) -> f64 {
        if !engine_running {
            return 0.0;
        }
        let ratio = self.current_ratio();
        if ratio == 0.0 {
            return 0.0;
        }
        let out = engine_torque * ratio.abs() * TRANSMISSION_EFFICIENCY;
        if ratio < 0.0 { -out } else { out }
    }

    /// Wheel speed implied by an engine speed through the current ratio
    /// (RPM). Zero in neutral.
    pub fn driven_wheel_rpm(&self, engine_rpm: f64) -> f64 {
        let ratio = self.current_ratio();
        if ratio == 0.0 {
            0.0
        } else {
            engine_rpm / ratio.abs()
        }
    }

    /// Effective torque multiplication of the current gear.
    pub fn torque_multiplier(&self) -> f64 {
        self.current_ratio().abs() * TRANSMISSION_EFFICIENCY
    }

    /// Top wheel-rim speed reachable in the current gear (m/s), given the
    /// engine's RPM ceiling and the wheel radius (m).
    pub fn max_speed_current_gear(&self, rpm_max: f64, wheel_radius_m: f64) -> f64 {
        let ratio = self.current_ratio().abs();
        if ratio == 0.0 {
            return 0.0;
        }
        let wheel_rpm_max = rpm_max / ratio;
        2.0 * std::f64::consts::PI * wheel_radius_m * (wheel_rpm_max / 60.0)
    }

    pub fn state(&self) -> GearState {
        self.state
    }

    pub fn is_neutral(&self) -> bool {
        self.state == GearState::Neutral
    }

    pub fn is_reverse(&self) -> bool {
        self.state == GearState::Reverse
    }

    pub fn gear_count(&self) -> usize {
        self.ratios.len()
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    pub fn can_shift_up(&self) -> bool {
        matches!(self.state, GearState::Forward(i) if i + 1 < self.ratios.len())
    }

    pub fn can_shift_down(&self) -> bool {
        matches!(self.state, GearState::Forward(i) if i > 0)
    }

    /// Dashboard label: "N", "R", or "1".."5".
    pub fn gear_label(&self) -> String {
        match self.state {
            GearState::Neutral => "N".to_string(),
            GearState::Reverse => "R".to_string(),
            GearState::Forward(i) => (i + 1).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_neutral() {
        let gb = Gearbox::new();
        assert!(gb.is_neutral());
        assert_eq!(gb.current_ratio(), 0.0);
        assert_eq!(gb.gear_label(), "N");
    }

    #[test]
    fn custom_ratios_validated() {
        assert!(Gearbox::with_ratios(vec![]).is_err());
        assert!(Gearbox::with_ratios(vec![3.0, -1.0]).is_err());
        assert!(Gearbox::with_ratios(vec![3.0, f64::NAN]).is_err());
        let gb = Gearbox::with_ratios(vec![4.0, 2.0, 1.0]).unwrap();
        assert_eq!(gb.gear_count(), 3);
    }

    #[test]
    fn select_bounds_checked() {
        let mut gb = Gearbox::new();
        assert!(!gb.shift(GearCommand::Select(5), 0.0));
        assert!(gb.is_neutral());
        assert!(gb.shift(GearCommand::Select(2), 0.0));
        assert_eq!(gb.state(), GearState::Forward(2));
        assert_eq!(gb.gear_label(), "3");
    }

    #[test]
    fn up_from_neutral_and_reverse_goes_to_first() {
        let mut gb = Gearbox::new();
        assert!(gb.shift(GearCommand::Up, 800.0));
        assert_eq!(gb.state(), GearState::Forward(0));

        let mut gb = Gearbox::new();
        assert!(gb.shift(GearCommand::Reverse, 800.0));
        assert!(gb.shift(GearCommand::Up, 800.0));
        assert_eq!(gb.state(), GearState::Forward(0));
    }

    #[test]
    fn upshift_past_top_gear_is_refused() {
        let mut gb = Gearbox::new();
        gb.shift(GearCommand::Select(4), 0.0);
        assert!(!gb.can_shift_up());
        assert!(!gb.shift(GearCommand::Up, 2000.0));
        assert_eq!(gb.state(), GearState::Forward(4));
    }

    #[test]
    fn downshift_refused_from_first_neutral_and_reverse() {
        let mut gb = Gearbox::new();
        assert!(!gb.shift(GearCommand::Down, 800.0));

        gb.shift(GearCommand::Select(0), 0.0);
        assert!(!gb.shift(GearCommand::Down, 800.0));

        gb.shift(GearCommand::Reverse, 800.0);
        assert!(!gb.shift(GearCommand::Down, 800.0));
        assert!(gb.is_reverse());
    }

    #[test]
    fn downshift_steps_one_gear() {
        let mut gb = Gearbox::new();
        gb.shift(GearCommand::Select(3), 0.0);
        assert!(gb.shift(GearCommand::Down, 2000.0));
        assert_eq!(gb.state(), GearState::Forward(2));
    }

    #[test]
    fn reverse_refused_at_speed() {
        let mut gb = Gearbox::new();
        assert!(!gb.shift(GearCommand::Reverse, 1200.0));
        assert!(gb.is_neutral());
        assert!(gb.shift(GearCommand::Reverse, 999.0));
        assert_eq!(gb.current_ratio(), REVERSE_RATIO);
        assert_eq!(gb.gear_label(), "R");
    }

    #[test]
    fn neutral_is_idempotent() {
        let mut gb = Gearbox::new();
        gb.shift(GearCommand::Select(2), 0.0);
        assert!(gb.shift(GearCommand::Neutral, 0.0));
        let first = gb.state();
        assert!(gb.shift(GearCommand::Neutral, 0.0));
        assert_eq!(gb.state(), first);
    }

    #[test]
    fn transmit_applies_ratio_and_efficiency() {
        let mut gb = Gearbox::new();
        gb.shift(GearCommand::Select(1), 0.0); // ratio 2.0
        // 100 × 2.0 × 0.95 = 190
        assert!((gb.transmit(100.0, true) - 190.0).abs() < 1e-9);
    }

    #[test]
    fn torque_multiplier_tracks_current_gear() {
        let mut gb = Gearbox::new();
        assert_eq!(gb.torque_multiplier(), 0.0); // neutral
        gb.shift(GearCommand::Select(0), 0.0);
        assert!((gb.torque_multiplier() - 3.5 * 0.95).abs() < 1e-12);
        gb.shift(GearCommand::Reverse, 500.0);
        assert!((gb.torque_multiplier() - 3.0 * 0.95).abs() < 1e-12);
    }

    #[test]
    fn transmit_zero_when_off_or_neutral() {
        let mut gb = Gearbox::new();
        assert_eq!(gb.transmit(100.0, true), 0.0); // neutral
        gb.shift(GearCommand::Select(0), 0.0);
        assert_eq!(gb.transmit(100.0, false), 0.0); // engine off
    }

    #[test]
    fn reverse_torque_is_negative() {
        let mut gb = Gearbox::new();
        gb.shift(GearCommand::Reverse, 500.0);
        let out = gb.transmit(100.0, true);
        assert!((out + 100.0 * 3.0 * 0.95).abs() < 1e-9);
    }

    #[test]
    fn driven_wheel_rpm_divides_by_ratio() {
        let mut gb = Gearbox::new();
        assert_eq!(gb.driven_wheel_rpm(3000.0), 0.0); // neutral
        gb.shift(GearCommand::Select(1), 0.0); // ratio 2.0
        assert!((gb.driven_wheel_rpm(3000.0) - 1500.0).abs() < 1e-9);
        gb.shift(GearCommand::Reverse, 500.0);
        assert!((gb.driven_wheel_rpm(3000.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn max_speed_grows_with_taller_gears() {
        let mut gb = Gearbox::new();
        gb.shift(GearCommand::Select(0), 0.0);
        let first = gb.max_speed_current_gear(7000.0, 0.3);
        gb.shift(GearCommand::Select(4), 0.0);
        let fifth = gb.max_speed_current_gear(7000.0, 0.3);
        assert!(fifth > first);
    }
}
