//! Telemetry samples as recorded from the hub.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cumulative drivebase encoder totals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrivebaseReading {
    /// Cumulative distance driven (mm).
    pub distance: f32,
    /// Cumulative drivebase angle (degrees, not wrapped).
    pub angle: f32,
}

impl DrivebaseReading {
    /// Create a drivebase reading.
    pub fn new(distance: f32, angle: f32) -> Self {
        Self { distance, angle }
    }
}

/// Single motor reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorReading {
    /// Motor shaft angle (degrees, cumulative).
    pub angle: f32,
    /// Motor speed reported by the hub (deg/s).
    #[serde(default)]
    pub speed: f32,
}

impl MotorReading {
    /// Create a motor reading.
    pub fn new(angle: f32, speed: f32) -> Self {
        Self { angle, speed }
    }
}

/// One telemetry sample.
///
/// Samples are expected in non-decreasing timestamp order. The sampling
/// interval is not assumed to be uniform.
///
/// # Example
///
/// ```
/// use marga::core::TelemetrySample;
///
/// let sample = TelemetrySample::new(100, 1)
///     .with_drivebase(20.0, 0.0)
///     .with_heading(0.0)
///     .with_motor("arm", 45.0, 120.0);
/// assert_eq!(sample.segment_id, 1);
/// assert!(sample.motor("arm").is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Monotonic hub time (ms).
    pub timestamp_ms: u64,

    /// Drivebase encoder totals, if a drivebase is registered.
    #[serde(default)]
    pub drivebase: Option<DrivebaseReading>,

    /// Per-motor readings keyed by registered motor name.
    #[serde(default)]
    pub motors: BTreeMap<String, MotorReading>,

    /// Inertial heading (degrees, any wraparound representation).
    #[serde(default)]
    pub heading: Option<f32>,

    /// Set when the operator deliberately corrected drift at this sample.
    #[serde(default)]
    pub correction: bool,

    /// Opaque id of the recording this sample belongs to.
    #[serde(default)]
    pub segment_id: u32,
}

impl TelemetrySample {
    /// Create an empty sample.
    pub fn new(timestamp_ms: u64, segment_id: u32) -> Self {
        Self {
            timestamp_ms,
            segment_id,
            ..Default::default()
        }
    }

    /// Attach drivebase totals.
    pub fn with_drivebase(mut self, distance: f32, angle: f32) -> Self {
        self.drivebase = Some(DrivebaseReading::new(distance, angle));
        self
    }

    /// Attach an inertial heading.
    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Attach a motor reading.
    pub fn with_motor(mut self, name: impl Into<String>, angle: f32, speed: f32) -> Self {
        self.motors.insert(name.into(), MotorReading::new(angle, speed));
        self
    }

    /// Mark this sample as an operator correction.
    pub fn with_correction(mut self, correction: bool) -> Self {
        self.correction = correction;
        self
    }

    /// Reading for a named motor.
    #[inline]
    pub fn motor(&self, name: &str) -> Option<&MotorReading> {
        self.motors.get(name)
    }

    /// Best available absolute heading: inertial first, then drivebase angle.
    #[inline]
    pub fn best_heading(&self) -> Option<f32> {
        self.heading.or(self.drivebase.map(|d| d.angle))
    }
}
