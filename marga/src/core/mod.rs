//! Core types for the synthesis pipeline.
//!
//! ## Type Categories
//!
//! ### Input
//! - [`TelemetrySample`]: one hub telemetry frame (drivebase totals, motors, IMU heading)
//! - [`DrivebaseReading`], [`MotorReading`]: the readings inside a sample
//!
//! ### Output
//! - [`MovementCommand`]: one reconstructed command with timing and segment id
//! - [`CommandKind`]: Drive, Turn, Arc or MotorRun payload
//! - [`GeneratedProgram`]: the ordered command list plus aggregates
//!
//! ### Math
//! - [`math`]: heading normalization and zero-safe arithmetic, all in degrees

mod command;
pub mod math;
mod program;
mod sample;

pub use command::{CommandKind, CommandType, DriveDirection, MovementCommand, RotationDirection};
pub use math::{heading_delta, normalize_heading};
pub use program::GeneratedProgram;
pub use sample::{DrivebaseReading, MotorReading, TelemetrySample};
