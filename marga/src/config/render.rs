//! Output options for the program renderer.

use serde::{Deserialize, Serialize};

use super::defaults;

/// How turns are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMode {
    /// `turn_to_heading(target)` against a heading reference captured at start.
    #[default]
    Absolute,
    /// `turn(angle)` relative to the current heading.
    Relative,
}

/// Renderer options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Turn rendering mode.
    #[serde(default)]
    pub heading_mode: HeadingMode,

    /// Decimal places for numeric values.
    #[serde(default = "defaults::decimals")]
    pub decimals: usize,

    /// Emit motor runs.
    #[serde(default = "defaults::enabled")]
    pub include_motor_runs: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_mode: HeadingMode::Absolute,
            decimals: 1,
            include_motor_runs: true,
        }
    }
}

impl RenderOptions {
    /// Options rendering relative turns.
    pub fn relative() -> Self {
        Self {
            heading_mode: HeadingMode::Relative,
            ..Default::default()
        }
    }
}
