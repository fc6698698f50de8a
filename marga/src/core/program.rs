//! Result of a synthesis run.

use serde::{Deserialize, Serialize};

use super::command::{CommandType, MovementCommand};

/// Ordered command list with aggregate statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedProgram {
    /// Commands in time order.
    pub commands: Vec<MovementCommand>,
    /// Path length over drive and arc commands (mm).
    pub total_distance_mm: f32,
    /// Time between the first and last sample (ms).
    pub total_time_ms: u64,
    /// First known heading, normalized (degrees).
    pub start_heading: f32,
    /// Last known heading, normalized (degrees).
    pub end_heading: f32,
}

impl GeneratedProgram {
    /// Program with no commands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the program has no commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over the commands.
    pub fn iter(&self) -> impl Iterator<Item = &MovementCommand> {
        self.commands.iter()
    }

    /// Number of commands of the given type.
    pub fn count(&self, command_type: CommandType) -> usize {
        self.commands
            .iter()
            .filter(|c| c.command_type() == command_type)
            .count()
    }
}
