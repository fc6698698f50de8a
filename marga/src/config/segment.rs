//! Segmenter thresholds.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Noise floor and classification settings for drivebase segmentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentSection {
    /// Accumulated distance that fires a boundary (mm).
    #[serde(default = "defaults::min_distance_mm")]
    pub min_distance_mm: f32,

    /// Accumulated heading change that fires a boundary (degrees).
    #[serde(default = "defaults::min_heading_deg")]
    pub min_heading_deg: f32,

    /// Equivalent distance of one degree of heading when both dimensions
    /// are significant (mm/deg).
    #[serde(default = "defaults::heading_to_distance_mm_per_deg")]
    pub heading_to_distance_mm_per_deg: f32,

    /// Fraction of a threshold that trailing residue must reach to become
    /// its own command when no earlier command can absorb it. At 0 any
    /// nonzero residue is kept.
    #[serde(default = "defaults::residual_fraction")]
    pub residual_fraction: f32,
}

impl Default for SegmentSection {
    fn default() -> Self {
        Self {
            min_distance_mm: 10.0,
            min_heading_deg: 5.0,
            heading_to_distance_mm_per_deg: 2.5,
            residual_fraction: 0.0,
        }
    }
}
