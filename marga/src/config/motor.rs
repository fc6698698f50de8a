//! Motor run detection settings.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-motor run thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorSection {
    /// Instantaneous angle delta that opens a run (degrees).
    #[serde(default = "defaults::motor_start_threshold_deg")]
    pub start_threshold_deg: f32,

    /// Minimum total angle for a closed run to be kept (degrees).
    #[serde(default = "defaults::motor_min_angle_deg")]
    pub min_angle_deg: f32,

    /// Speed at or below which a run with a small delta is considered stopped (deg/s).
    #[serde(default = "defaults::motor_stop_speed_deg_s")]
    pub stop_speed_deg_s: f32,

    /// Motors that belong to the drivebase.
    ///
    /// They are skipped while drivebase telemetry covers the same pairing.
    #[serde(default = "defaults::drivebase_motors")]
    pub drivebase_motors: Vec<String>,
}

impl Default for MotorSection {
    fn default() -> Self {
        Self {
            start_threshold_deg: 1.0,
            min_angle_deg: 5.0,
            stop_speed_deg_s: 10.0,
            drivebase_motors: defaults::drivebase_motors(),
        }
    }
}

impl MotorSection {
    /// Whether a motor name belongs to the drivebase.
    pub fn is_drivebase_motor(&self, name: &str) -> bool {
        self.drivebase_motors.iter().any(|m| m == name)
    }
}
