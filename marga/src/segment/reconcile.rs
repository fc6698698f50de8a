//! Delta reconciliation on command-type switches.
//!
//! When the segmenter switches from one command type to another, the deltas
//! accumulated since the last boundary still contain small jitter in the
//! dimension the closing command was about. That jitter is folded into the
//! tail of the closing command. The other dimension carries forward into the
//! command about to open.
//!
//! | Closing | Absorbs |
//! |---------|---------|
//! | Drive   | distance |
//! | Turn    | heading |
//! | Arc     | distance and heading, whichever the next command does not use |

use crate::core::{CommandKind, CommandType, MovementCommand};

/// Deltas accumulated since the last boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Residual {
    /// Distance (mm).
    pub distance: f32,
    /// Heading change (degrees).
    pub heading: f32,
}

impl Residual {
    /// Whether both dimensions are exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.distance == 0.0 && self.heading == 0.0
    }
}

/// Whether commands of this type carry distance.
#[inline]
pub fn consumes_distance(command_type: CommandType) -> bool {
    matches!(command_type, CommandType::Drive | CommandType::Arc)
}

/// Whether commands of this type carry heading change.
#[inline]
pub fn consumes_heading(command_type: CommandType) -> bool {
    matches!(command_type, CommandType::Turn | CommandType::Arc)
}

/// Fold residual deltas into the tail of `closed`.
///
/// `next` is the type about to open, or `None` at the end of a segment.
/// Absorbed dimensions are zeroed in `residual`. Returns whether anything
/// was absorbed.
pub fn reconcile(
    closed: &mut MovementCommand,
    next: Option<CommandType>,
    residual: &mut Residual,
) -> bool {
    let closing = closed.command_type();
    let mut absorbed = false;

    let take_distance = consumes_distance(closing)
        && residual.distance != 0.0
        && !next.is_some_and(consumes_distance);
    if take_distance {
        absorb_distance(closed, residual.distance);
        residual.distance = 0.0;
        absorbed = true;
    }

    let take_heading = consumes_heading(closing)
        && residual.heading != 0.0
        && !next.is_some_and(consumes_heading);
    if take_heading {
        absorb_heading(closed, residual.heading);
        residual.heading = 0.0;
        absorbed = true;
    }

    if absorbed {
        log::debug!(
            "Reconciled into {} at {} ms: {}",
            closing,
            closed.start_ms,
            closed.label()
        );
    }
    absorbed
}

/// Add distance to a drive or arc, recomputing derived fields.
pub fn absorb_distance(command: &mut MovementCommand, extra: f32) {
    let updated = match &command.kind {
        CommandKind::Drive { distance, .. } => CommandKind::drive(distance + extra),
        CommandKind::Arc {
            distance, angle, ..
        } => CommandKind::arc(distance + extra, *angle),
        _ => return,
    };
    command.kind = updated;
}

/// Add heading change to a turn or arc, recomputing derived fields.
pub fn absorb_heading(command: &mut MovementCommand, extra: f32) {
    let updated = match &command.kind {
        CommandKind::Turn {
            angle,
            start_heading,
            ..
        } => CommandKind::turn(angle + extra, *start_heading),
        CommandKind::Arc {
            distance, angle, ..
        } => CommandKind::arc(*distance, angle + extra),
        _ => return,
    };
    command.kind = updated;
}
