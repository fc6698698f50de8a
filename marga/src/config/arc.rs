//! Arc stability settings.
//!
//! The values are tuned for one small two-wheel robot and are not derived
//! from its geometry. Override them per robot.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Arc qualification thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcSection {
    /// Minimum absolute distance of an arc (mm).
    #[serde(default = "defaults::arc_min_distance_mm")]
    pub min_distance_mm: f32,

    /// Minimum absolute heading change of an arc (degrees).
    #[serde(default = "defaults::arc_min_heading_deg")]
    pub min_heading_deg: f32,

    /// Minimum number of consecutive same-sign samples.
    #[serde(default = "defaults::arc_min_streak")]
    pub min_streak: usize,

    /// Scale converting streak heading into distance for the ratio test (mm/deg).
    #[serde(default = "defaults::arc_ratio_scale_mm_per_deg")]
    pub ratio_scale_mm_per_deg: f32,

    /// Lower bound of the distance/heading plausibility band.
    #[serde(default = "defaults::arc_ratio_min")]
    pub ratio_min: f32,

    /// Upper bound of the distance/heading plausibility band.
    #[serde(default = "defaults::arc_ratio_max")]
    pub ratio_max: f32,
}

impl Default for ArcSection {
    fn default() -> Self {
        Self {
            min_distance_mm: 20.0,
            min_heading_deg: 2.0,
            min_streak: 2,
            ratio_scale_mm_per_deg: 10.0,
            ratio_min: 0.4,
            ratio_max: 2.0,
        }
    }
}
