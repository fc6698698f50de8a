//! Discrete motion commands reconstructed from telemetry.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::math::{arc_radius, normalize_heading, rate_per_second, sign};

/// Direction of travel for drives and arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveDirection {
    /// Positive distance.
    Forward,
    /// Negative distance.
    Backward,
}

impl DriveDirection {
    /// Direction for a signed distance. Zero counts as forward.
    #[inline]
    pub fn from_distance(distance: f32) -> Self {
        if distance < 0.0 {
            DriveDirection::Backward
        } else {
            DriveDirection::Forward
        }
    }
}

/// Rotation sense of a motor shaft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    /// Positive angle delta.
    Clockwise,
    /// Negative angle delta.
    CounterClockwise,
}

impl RotationDirection {
    /// Direction for a signed angle. Zero counts as clockwise.
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        if angle < 0.0 {
            RotationDirection::CounterClockwise
        } else {
            RotationDirection::Clockwise
        }
    }
}

/// Command type without payload, used for classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Straight drive.
    Drive,
    /// Turn in place.
    Turn,
    /// Combined drive and turn along a circle.
    Arc,
    /// Single motor run.
    MotorRun,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandType::Drive => "drive",
            CommandType::Turn => "turn",
            CommandType::Arc => "arc",
            CommandType::MotorRun => "motor_run",
        };
        f.write_str(name)
    }
}

/// Type-specific payload of a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    /// Straight drive.
    Drive {
        /// Signed distance (mm).
        distance: f32,
        /// Derived from the distance sign.
        direction: DriveDirection,
    },
    /// Turn in place.
    Turn {
        /// Signed rotation (degrees).
        angle: f32,
        /// Heading when the turn started, normalized.
        start_heading: f32,
        /// Heading after the turn, normalized.
        target_heading: f32,
    },
    /// Arc drive.
    Arc {
        /// Signed distance (mm).
        distance: f32,
        /// Signed heading change (degrees).
        angle: f32,
        /// Fitted radius (mm), 0 when the angle is negligible.
        radius: f32,
        /// Derived from the distance sign.
        direction: DriveDirection,
    },
    /// Run of a single named motor.
    MotorRun {
        /// Motor name as registered on the hub.
        motor: String,
        /// Shaft angle when the run started (degrees).
        start_angle: f32,
        /// Signed angle delta (degrees).
        angle: f32,
        /// Shaft angle at the end of the run (degrees).
        target_angle: f32,
        /// Estimated angular speed (deg/s).
        speed: f32,
        /// Derived from the angle sign.
        direction: RotationDirection,
    },
}

impl CommandKind {
    /// Drive payload for a signed distance.
    pub fn drive(distance: f32) -> Self {
        CommandKind::Drive {
            distance,
            direction: DriveDirection::from_distance(distance),
        }
    }

    /// Turn payload starting at `start_heading`.
    pub fn turn(angle: f32, start_heading: f32) -> Self {
        let start_heading = normalize_heading(start_heading);
        CommandKind::Turn {
            angle,
            start_heading,
            target_heading: normalize_heading(start_heading + angle),
        }
    }

    /// Arc payload with the radius fitted from distance and angle.
    pub fn arc(distance: f32, angle: f32) -> Self {
        CommandKind::Arc {
            distance,
            angle,
            radius: arc_radius(distance, angle),
            direction: DriveDirection::from_distance(distance),
        }
    }

    /// Motor run payload. Speed is estimated from the angle over the duration.
    pub fn motor_run(
        motor: impl Into<String>,
        start_angle: f32,
        angle: f32,
        duration_ms: u64,
    ) -> Self {
        CommandKind::MotorRun {
            motor: motor.into(),
            start_angle,
            angle,
            target_angle: start_angle + angle,
            speed: rate_per_second(angle, duration_ms),
            direction: RotationDirection::from_angle(angle),
        }
    }

    /// Payload-free type.
    pub fn command_type(&self) -> CommandType {
        match self {
            CommandKind::Drive { .. } => CommandType::Drive,
            CommandKind::Turn { .. } => CommandType::Turn,
            CommandKind::Arc { .. } => CommandType::Arc,
            CommandKind::MotorRun { .. } => CommandType::MotorRun,
        }
    }
}

/// A reconstructed motion command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementCommand {
    /// Timestamp the movement started (ms).
    pub start_ms: u64,
    /// Duration of the movement (ms).
    pub duration_ms: u64,
    /// Operator correction flag.
    pub correction: bool,
    /// Recording the command was derived from.
    pub segment_id: u32,
    /// Type-specific payload.
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl MovementCommand {
    /// Create a command.
    pub fn new(start_ms: u64, duration_ms: u64, segment_id: u32, kind: CommandKind) -> Self {
        Self {
            start_ms,
            duration_ms,
            correction: false,
            segment_id,
            kind,
        }
    }

    /// Set the correction flag.
    pub fn with_correction(mut self, correction: bool) -> Self {
        self.correction = correction;
        self
    }

    /// Timestamp the movement ended (ms).
    #[inline]
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    /// Payload-free type.
    #[inline]
    pub fn command_type(&self) -> CommandType {
        self.kind.command_type()
    }

    /// Signed primary magnitude: distance for drives, angle otherwise.
    ///
    /// For arcs the angle gives the turning sense.
    pub fn signed_value(&self) -> f32 {
        match &self.kind {
            CommandKind::Drive { distance, .. } => *distance,
            CommandKind::Turn { angle, .. } => *angle,
            CommandKind::Arc { angle, .. } => *angle,
            CommandKind::MotorRun { angle, .. } => *angle,
        }
    }

    /// Sign of [`Self::signed_value`].
    #[inline]
    pub fn sign(&self) -> i8 {
        sign(self.signed_value())
    }

    /// Signed distance contributed by this command (0 for turns and motor runs).
    pub fn distance(&self) -> f32 {
        match &self.kind {
            CommandKind::Drive { distance, .. } | CommandKind::Arc { distance, .. } => *distance,
            _ => 0.0,
        }
    }

    /// Signed heading change contributed by this command.
    pub fn heading_change(&self) -> f32 {
        match &self.kind {
            CommandKind::Turn { angle, .. } | CommandKind::Arc { angle, .. } => *angle,
            _ => 0.0,
        }
    }

    /// Short human-readable summary.
    pub fn label(&self) -> String {
        match &self.kind {
            CommandKind::Drive { distance, .. } => format!("drive {:.1} mm", distance),
            CommandKind::Turn {
                angle,
                target_heading,
                ..
            } => format!("turn {:.1} deg to {:.1}", angle, target_heading),
            CommandKind::Arc {
                distance,
                angle,
                radius,
                ..
            } => format!(
                "arc {:.1} mm over {:.1} deg (r={:.1})",
                distance, angle, radius
            ),
            CommandKind::MotorRun { motor, angle, .. } => {
                format!("motor {} {:.1} deg", motor, angle)
            }
        }
    }
}
