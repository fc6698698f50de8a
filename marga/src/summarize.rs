//! Second-pass merge of adjacent compatible commands.
//!
//! The segmenter and motor tracker emit commands as they close, so the raw
//! list is sorted by start time first (stable, so ties keep emission order).
//! Neighbours then merge when all of these hold:
//!
//! - same command type and same segment id
//! - same sign of the signed magnitude, or the later command is an operator
//!   correction
//! - arcs: same turning sense and same drive direction, even for corrections
//! - motor runs: same motor
//!
//! Commands from different segments never merge.

use crate::core::math::signs_agree;
use crate::core::{CommandKind, MovementCommand};

/// Sort and merge a raw command list.
pub fn summarize(mut commands: Vec<MovementCommand>) -> Vec<MovementCommand> {
    commands.sort_by_key(|c| c.start_ms);

    let raw = commands.len();
    let mut merged: Vec<MovementCommand> = Vec::with_capacity(raw);
    for command in commands {
        if let Some(previous) = merged.last_mut() {
            if can_merge(previous, &command) {
                merge_into(previous, &command);
                continue;
            }
        }
        merged.push(command);
    }

    if merged.len() < raw {
        log::debug!("Summarized {} raw commands into {}", raw, merged.len());
    }
    merged
}

/// Whether `later` can be folded into `earlier`.
pub fn can_merge(earlier: &MovementCommand, later: &MovementCommand) -> bool {
    if earlier.segment_id != later.segment_id || earlier.command_type() != later.command_type() {
        return false;
    }

    match (&earlier.kind, &later.kind) {
        (CommandKind::Arc { direction: d1, .. }, CommandKind::Arc { direction: d2, .. }) => {
            d1 == d2 && signs_agree(earlier.sign(), later.sign())
        }
        (CommandKind::MotorRun { motor: m1, .. }, CommandKind::MotorRun { motor: m2, .. })
            if m1 != m2 =>
        {
            false
        }
        _ => later.correction || signs_agree(earlier.sign(), later.sign()),
    }
}

/// Fold `later` into `earlier`.
///
/// Callers check [`can_merge`] first; mismatched kinds leave `earlier`
/// untouched apart from timing.
pub fn merge_into(earlier: &mut MovementCommand, later: &MovementCommand) {
    let kind = match (&earlier.kind, &later.kind) {
        (CommandKind::Drive { distance: d1, .. }, CommandKind::Drive { distance: d2, .. }) => {
            CommandKind::drive(d1 + d2)
        }
        (
            CommandKind::Turn {
                angle: a1,
                start_heading,
                ..
            },
            CommandKind::Turn { angle: a2, .. },
        ) => CommandKind::turn(a1 + a2, *start_heading),
        (
            CommandKind::Arc {
                distance: d1,
                angle: a1,
                ..
            },
            CommandKind::Arc {
                distance: d2,
                angle: a2,
                ..
            },
        ) => CommandKind::arc(d1 + d2, a1 + a2),
        (
            CommandKind::MotorRun {
                motor,
                start_angle,
                angle: a1,
                ..
            },
            CommandKind::MotorRun { angle: a2, .. },
        ) => CommandKind::motor_run(
            motor.clone(),
            *start_angle,
            a1 + a2,
            earlier.duration_ms + later.duration_ms,
        ),
        _ => earlier.kind.clone(),
    };

    log::trace!(
        "Merging {} at {} ms into {} at {} ms",
        later.label(),
        later.start_ms,
        earlier.label(),
        earlier.start_ms
    );

    earlier.kind = kind;
    earlier.duration_ms += later.duration_ms;
    earlier.correction |= later.correction;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CommandType, DriveDirection};
    use approx::assert_relative_eq;

    fn drive(start: u64, distance: f32) -> MovementCommand {
        MovementCommand::new(start, 100, 0, CommandKind::drive(distance))
    }

    #[test]
    fn test_same_sign_drives_merge() {
        let out = summarize(vec![drive(0, 20.0), drive(100, 30.0)]);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].distance(), 50.0);
        assert_eq!(out[0].duration_ms, 200);
    }

    #[test]
    fn test_sign_reversal_stays_separate() {
        let out = summarize(vec![drive(0, 50.0), drive(100, -20.0)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_correction_merges_across_reversal() {
        let out = summarize(vec![
            drive(0, 20.0),
            drive(100, -50.0).with_correction(true),
        ]);
        assert_eq!(out.len(), 1);
        assert!(out[0].correction);
        match out[0].kind {
            CommandKind::Drive {
                distance,
                direction,
            } => {
                assert_relative_eq!(distance, -30.0);
                assert_eq!(direction, DriveDirection::Backward);
            }
            ref other => panic!("expected drive, got {:?}", other),
        }
    }

    #[test]
    fn test_segments_never_merge() {
        let mut second = drive(100, 30.0);
        second.segment_id = 1;
        let out = summarize(vec![drive(0, 20.0), second]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_sorts_by_start_keeping_ties() {
        let turn = MovementCommand::new(0, 100, 0, CommandKind::turn(90.0, 0.0));
        let out = summarize(vec![drive(200, 20.0), drive(0, 30.0), turn]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].command_type(), CommandType::Drive);
        assert_eq!(out[1].command_type(), CommandType::Turn);
        assert_eq!(out[2].start_ms, 200);
    }

    #[test]
    fn test_turn_merge_retargets_from_first_start() {
        let out = summarize(vec![
            MovementCommand::new(0, 100, 0, CommandKind::turn(120.0, 100.0)),
            MovementCommand::new(100, 100, 0, CommandKind::turn(30.0, -140.0)),
        ]);
        assert_eq!(out.len(), 1);
        match out[0].kind {
            CommandKind::Turn {
                angle,
                start_heading,
                target_heading,
            } => {
                assert_relative_eq!(angle, 150.0);
                assert_relative_eq!(start_heading, 100.0);
                assert_relative_eq!(target_heading, -110.0);
            }
            ref other => panic!("expected turn, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_merge_refits_radius() {
        let out = summarize(vec![
            MovementCommand::new(0, 100, 0, CommandKind::arc(45.0, 9.0)),
            MovementCommand::new(100, 100, 0, CommandKind::arc(45.0, 9.0)),
        ]);
        assert_eq!(out.len(), 1);
        match out[0].kind {
            CommandKind::Arc { radius, .. } => {
                assert_relative_eq!(radius, 90.0 / 18.0f32.to_radians(), epsilon = 1e-2);
            }
            ref other => panic!("expected arc, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_direction_mismatch_never_merges() {
        let forward = MovementCommand::new(0, 100, 0, CommandKind::arc(45.0, 9.0));
        let backward =
            MovementCommand::new(100, 100, 0, CommandKind::arc(-45.0, 9.0)).with_correction(true);
        assert!(!can_merge(&forward, &backward));

        let opposite =
            MovementCommand::new(100, 100, 0, CommandKind::arc(45.0, -9.0)).with_correction(true);
        assert!(!can_merge(&forward, &opposite));
    }

    #[test]
    fn test_motor_runs_merge_per_motor() {
        let arm = |start, angle| {
            MovementCommand::new(start, 100, 0, CommandKind::motor_run("arm", 0.0, angle, 100))
        };
        let claw = MovementCommand::new(100, 100, 0, CommandKind::motor_run("claw", 0.0, 30.0, 100));

        assert!(!can_merge(&arm(0, 30.0), &claw));

        let out = summarize(vec![arm(0, 30.0), arm(100, 60.0)]);
        assert_eq!(out.len(), 1);
        match &out[0].kind {
            CommandKind::MotorRun {
                angle,
                target_angle,
                speed,
                ..
            } => {
                assert_relative_eq!(*angle, 90.0);
                assert_relative_eq!(*target_angle, 90.0);
                assert_relative_eq!(*speed, 450.0);
            }
            other => panic!("expected motor run, got {:?}", other),
        }
    }
}
