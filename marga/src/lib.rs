//! # Marga
//!
//! Reconstructs robot motion programs from recorded hub telemetry.
//!
//! ## Overview
//!
//! A recording is an ordered list of [`TelemetrySample`]s: cumulative
//! drivebase distance and angle, inertial heading and per-motor shaft angles.
//! Marga turns it into the shortest list of discrete commands that plausibly
//! produced it:
//!
//! - **Drive** - straight drive, forward or backward
//! - **Turn** - rotation in place, with start and target heading
//! - **Arc** - combined drive and turn with a fitted radius
//! - **MotorRun** - a single named motor turning by an angle
//!
//! ## Pipeline
//!
//! ```text
//!              ┌─► Segmenter ─────────┐
//! samples ─────┤   (arc tracker,      ├─► raw commands ─► summarize ─► GeneratedProgram
//!  (one pass)  │    reconciler)       │                                   │
//!              └─► MotorSegmentTracker┘                      render_program / command_sequence
//! ```
//!
//! Every call is a pure function of the samples and the [`SynthConfig`]
//! passed in. Nothing is cached between calls, so re-running over a growing
//! recording for a live preview is reproducible.
//!
//! ## Quick Start
//!
//! ```
//! use marga::{RenderOptions, SynthConfig, TelemetrySample, render_program, synthesize};
//!
//! let samples = vec![
//!     TelemetrySample::new(0, 0).with_drivebase(0.0, 0.0).with_heading(0.0),
//!     TelemetrySample::new(100, 0).with_drivebase(20.0, 0.0).with_heading(0.0),
//!     TelemetrySample::new(200, 0).with_drivebase(40.0, 0.0).with_heading(0.0),
//!     TelemetrySample::new(300, 0).with_drivebase(40.0, 90.0).with_heading(90.0),
//! ];
//!
//! let program = synthesize(&samples, &SynthConfig::default()).unwrap();
//! assert_eq!(program.len(), 2);
//!
//! let text = render_program(&program, &RenderOptions::default());
//! assert!(text.contains("turn_to_heading(90.0)"));
//! ```
//!
//! ## Conventions
//!
//! - Distances in millimetres, angles in degrees, time in milliseconds
//! - Headings normalized into (-180, 180], clockwise positive as reported by the hub

#![warn(missing_docs)]

// Samples, commands, programs and angle math
pub mod core;

// Thresholds and output options
pub mod config;

// Error types
pub mod error;

// Drivebase segmentation
pub mod segment;

// Per-motor run detection
pub mod motor;

// Second-pass merge
pub mod summarize;

// Pseudocode and hub command output
pub mod render;

pub use crate::config::{
    ArcSection, HeadingMode, MotorSection, RenderOptions, SegmentSection, SynthConfig,
};
pub use crate::core::{
    CommandKind, CommandType, DriveDirection, DrivebaseReading, GeneratedProgram, MotorReading,
    MovementCommand, RotationDirection, TelemetrySample,
};
pub use crate::error::{ConfigError, Result, SynthError};
pub use crate::motor::MotorSegmentTracker;
pub use crate::render::{command_sequence, render_program};
pub use crate::segment::Segmenter;
pub use crate::summarize::summarize;

use crate::core::math::normalize_heading;

/// Reconstruct a program from a recording.
///
/// Fails only on call-contract violations: an invalid configuration or
/// samples out of timestamp order. Fewer than two samples yield an empty
/// program.
pub fn synthesize(samples: &[TelemetrySample], config: &SynthConfig) -> Result<GeneratedProgram> {
    config.validate()?;
    check_order(samples)?;

    if samples.len() < 2 {
        return Ok(GeneratedProgram::empty());
    }
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Ok(GeneratedProgram::empty());
    };

    let commands = summarize(extract_commands(samples, config));

    let total_distance_mm = commands.iter().map(|c| c.distance().abs()).sum();
    let start_heading = samples
        .iter()
        .find_map(TelemetrySample::best_heading)
        .map(normalize_heading)
        .unwrap_or(0.0);
    let end_heading = samples
        .iter()
        .rev()
        .find_map(TelemetrySample::best_heading)
        .map(normalize_heading)
        .unwrap_or(0.0);

    log::debug!(
        "Synthesized {} commands from {} samples",
        commands.len(),
        samples.len()
    );

    Ok(GeneratedProgram {
        commands,
        total_distance_mm,
        total_time_ms: last.timestamp_ms.saturating_sub(first.timestamp_ms),
        start_heading,
        end_heading,
    })
}

/// Raw, unmerged commands in emission order.
///
/// Drives the segmenter and the motor tracker over the samples in a single
/// pass. Does not check the sample order.
pub fn extract_commands(samples: &[TelemetrySample], config: &SynthConfig) -> Vec<MovementCommand> {
    let mut segmenter = Segmenter::new(config);
    let mut motors = MotorSegmentTracker::new(&config.motor);
    let mut out = Vec::new();

    for sample in samples {
        segmenter.push(sample, &mut out);
        motors.push(sample, &mut out);
    }
    segmenter.finish(&mut out);
    motors.finish(&mut out);

    out
}

fn check_order(samples: &[TelemetrySample]) -> Result<()> {
    for (index, pair) in samples.windows(2).enumerate() {
        if pair[1].timestamp_ms < pair[0].timestamp_ms {
            return Err(SynthError::UnorderedSamples {
                index: index + 1,
                previous_ms: pair[0].timestamp_ms,
                timestamp_ms: pair[1].timestamp_ms,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_empty() {
        let config = SynthConfig::default();
        assert!(synthesize(&[], &config).unwrap().is_empty());

        let one = [TelemetrySample::new(0, 0).with_drivebase(0.0, 0.0)];
        let program = synthesize(&one, &config).unwrap();
        assert!(program.is_empty());
        assert_eq!(program.total_time_ms, 0);
    }

    #[test]
    fn test_unordered_samples_rejected() {
        let samples = [
            TelemetrySample::new(0, 0),
            TelemetrySample::new(200, 0),
            TelemetrySample::new(100, 0),
        ];
        let err = synthesize(&samples, &SynthConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SynthError::UnorderedSamples {
                index: 2,
                previous_ms: 200,
                timestamp_ms: 100,
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SynthConfig::default();
        config.segment.min_distance_mm = 0.0;
        let samples = [TelemetrySample::new(0, 0), TelemetrySample::new(100, 0)];
        assert!(matches!(
            synthesize(&samples, &config),
            Err(SynthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        let samples = [
            TelemetrySample::new(0, 0).with_drivebase(0.0, 0.0),
            TelemetrySample::new(0, 0).with_drivebase(0.0, 0.0),
        ];
        assert!(synthesize(&samples, &SynthConfig::default()).is_ok());
    }
}
