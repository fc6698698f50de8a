//! Program output.
//!
//! - [`render_program`]: commented pseudocode for people to read
//! - [`command_sequence`]: the hub's JSON command-sequence format
//!
//! Neither function classifies anything; they only format the command list.

use std::fmt::Write;

use serde_json::{Value, json};

use crate::config::{HeadingMode, RenderOptions};
use crate::core::math::{normalize_heading, rate_per_second};
use crate::core::{
    CommandKind, DriveDirection, GeneratedProgram, MovementCommand, RotationDirection,
};

/// Speed used when a command has no duration to derive one from.
pub const DEFAULT_SPEED: f32 = 100.0;

/// Render a program as commented pseudocode.
///
/// # Example
///
/// ```
/// use marga::{CommandKind, GeneratedProgram, MovementCommand, RenderOptions, render_program};
///
/// let program = GeneratedProgram {
///     commands: vec![MovementCommand::new(0, 200, 0, CommandKind::drive(40.0))],
///     total_distance_mm: 40.0,
///     total_time_ms: 200,
///     ..Default::default()
/// };
/// let text = render_program(&program, &RenderOptions::default());
/// assert!(text.contains("drive_straight(40.0)"));
/// ```
pub fn render_program(program: &GeneratedProgram, options: &RenderOptions) -> String {
    let num = |v: f32| format_number(v, options.decimals);
    let mut text = String::new();

    let _ = writeln!(text, "# Program reconstructed from telemetry");
    if program.is_empty() {
        let _ = writeln!(text, "# No movement detected");
        return text;
    }
    let _ = writeln!(text, "# Commands: {}", program.len());
    let _ = writeln!(text, "# Total distance: {} mm", num(program.total_distance_mm));
    let _ = writeln!(text, "# Total time: {} ms", program.total_time_ms);
    let _ = writeln!(
        text,
        "# Heading: {} -> {} deg",
        num(normalize_heading(program.start_heading)),
        num(normalize_heading(program.end_heading))
    );
    text.push('\n');

    if options.heading_mode == HeadingMode::Absolute {
        let _ = writeln!(text, "await pilot.reset_heading_reference()");
    }

    let multi_segment = program
        .iter()
        .any(|c| c.segment_id != program.commands[0].segment_id);
    let mut segment = None;

    for command in program.iter() {
        if !options.include_motor_runs && matches!(command.kind, CommandKind::MotorRun { .. }) {
            continue;
        }
        if multi_segment && segment != Some(command.segment_id) {
            let _ = writeln!(text, "# segment {}", command.segment_id);
            segment = Some(command.segment_id);
        }
        let _ = writeln!(
            text,
            "{}  # {}",
            command_line(command, options, program.start_heading),
            annotation(command, options.decimals)
        );
    }
    text
}

/// One pseudocode call.
///
/// Absolute turns target headings relative to `reference`, the heading the
/// preamble's `reset_heading_reference()` makes zero.
fn command_line(command: &MovementCommand, options: &RenderOptions, reference: f32) -> String {
    let num = |v: f32| format_number(v, options.decimals);
    match &command.kind {
        CommandKind::Drive { distance, .. } => {
            format!("await pilot.drive_straight({})", num(*distance))
        }
        CommandKind::Turn {
            angle,
            target_heading,
            ..
        } => match options.heading_mode {
            HeadingMode::Absolute => format!(
                "await pilot.turn_to_heading({})",
                num(normalize_heading(*target_heading - reference))
            ),
            HeadingMode::Relative => format!("await pilot.turn({})", num(*angle)),
        },
        CommandKind::Arc {
            distance,
            angle,
            radius,
            ..
        } => format!(
            "await pilot.drive_arc({}, {})",
            num(signed_radius(*radius, *distance)),
            num(*angle)
        ),
        CommandKind::MotorRun {
            motor,
            angle,
            speed,
            ..
        } => format!(
            "await motors[\"{}\"].run_angle({}, {})",
            motor,
            num(speed.abs()),
            num(*angle)
        ),
    }
}

fn annotation(command: &MovementCommand, decimals: usize) -> String {
    let num = |v: f32| format_number(v, decimals);
    let what = match &command.kind {
        CommandKind::Drive { direction, .. } => match direction {
            DriveDirection::Forward => "forward".to_string(),
            DriveDirection::Backward => "backward".to_string(),
        },
        CommandKind::Turn { angle, .. } => format!("turn {} deg", num(*angle)),
        CommandKind::Arc {
            distance, radius, ..
        } => format!("arc {} mm, r={} mm", num(*distance), num(*radius)),
        CommandKind::MotorRun { direction, .. } => match direction {
            RotationDirection::Clockwise => "cw".to_string(),
            RotationDirection::CounterClockwise => "ccw".to_string(),
        },
    };
    let mut note = format!("{}, {} ms", what, command.duration_ms);
    if command.correction {
        note.push_str(", correction");
    }
    note
}

/// Render a program as the hub's JSON command sequence.
///
/// Drive, turn and arc entries carry a `stop_behavior`: `hold` when the entry
/// is the last in the sequence, `coast_smart` otherwise. Speeds are derived
/// from magnitude over duration, or [`DEFAULT_SPEED`] when the duration is 0.
pub fn command_sequence(program: &GeneratedProgram) -> Value {
    let last = program.len().saturating_sub(1);
    let entries = program
        .iter()
        .enumerate()
        .map(|(i, command)| {
            let speed = round2(sequence_speed(command));
            let mut entry = match &command.kind {
                CommandKind::Drive { distance, .. } => json!({
                    "action": "drive",
                    "distance": round2(*distance),
                    "speed": speed,
                }),
                CommandKind::Turn { angle, .. } => json!({
                    "action": "turn",
                    "angle": round2(*angle),
                    "speed": speed,
                }),
                CommandKind::Arc {
                    distance,
                    angle,
                    radius,
                    ..
                } => json!({
                    "action": "arc",
                    "radius": round2(signed_radius(*radius, *distance)),
                    "angle": round2(*angle),
                    "speed": speed,
                }),
                CommandKind::MotorRun { motor, angle, .. } => json!({
                    "action": "motor",
                    "motor": motor,
                    "angle": round2(*angle),
                    "speed": speed,
                }),
            };

            if !matches!(command.kind, CommandKind::MotorRun { .. }) {
                let stop = if i == last { "hold" } else { "coast_smart" };
                entry["stop_behavior"] = json!(stop);
            }
            entry
        })
        .collect();
    Value::Array(entries)
}

fn sequence_speed(command: &MovementCommand) -> f32 {
    let magnitude = match &command.kind {
        CommandKind::Drive { distance, .. } | CommandKind::Arc { distance, .. } => distance.abs(),
        CommandKind::Turn { angle, .. } | CommandKind::MotorRun { angle, .. } => angle.abs(),
    };
    if command.duration_ms == 0 {
        DEFAULT_SPEED
    } else {
        rate_per_second(magnitude, command.duration_ms)
    }
}

/// Arc radius carrying the drive direction: negative when driving backward.
fn signed_radius(radius: f32, distance: f32) -> f32 {
    if distance < 0.0 { -radius } else { radius }
}

fn round2(value: f32) -> f64 {
    (value as f64 * 100.0).round() / 100.0
}

/// Fixed-decimal formatting that never prints a negative zero.
pub fn format_number(value: f32, decimals: usize) -> String {
    let scale = 10f32.powi(decimals as i32);
    let value = if (value * scale).round() == 0.0 {
        0.0
    } else {
        value
    };
    format!("{:.*}", decimals, value)
}
