//! Arc stability tracking.
//!
//! A drive and a turn that happen to change in the same sample are not an
//! arc. An arc shows up as a run of consecutive samples where both distance
//! and heading move, each keeping its sign. The tracker follows that run
//! (the streak) across boundary windows.
//!
//! # Qualification
//!
//! A window is an arc only when all of these hold:
//!
//! 1. The streak is at least `min_streak` samples long
//! 2. The streak covers at least `min_distance_mm` and `min_heading_deg`
//! 3. `|distance| / (|heading| * ratio_scale)` lies inside `[ratio_min, ratio_max]`
//! 4. The window moved in the same sense as the streak
//!
//! ```text
//! distance  +15  +15  +15   0   +15
//! heading    +3   +3   +3  +3    +3
//! streak      1    2    3   0     1
//!                          ^ zero delta resets
//! ```

use crate::config::ArcSection;
use crate::core::math::{safe_div, sign, signs_agree};

/// Current streak of consistent drive+turn samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcStreak {
    /// Number of samples in the streak.
    pub count: usize,
    /// Distance covered by the streak (mm).
    pub distance: f32,
    /// Heading change covered by the streak (degrees).
    pub heading: f32,
    /// Timestamp of the sample the streak started from (ms).
    pub start_ms: u64,
}

impl ArcStreak {
    /// Distance over scaled heading. 0 when the heading is negligible.
    #[inline]
    pub fn ratio(&self, scale_mm_per_deg: f32) -> f32 {
        safe_div(self.distance.abs(), self.heading.abs() * scale_mm_per_deg)
    }
}

/// Tracks the streak over consecutive instantaneous deltas.
#[derive(Clone, Debug, Default)]
pub struct ArcStabilityTracker {
    streak: ArcStreak,
    last_distance_sign: i8,
    last_heading_sign: i8,
}

impl ArcStabilityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one instantaneous delta pair.
    ///
    /// `from_ms` is the timestamp of the earlier sample of the pairing.
    pub fn update(&mut self, distance: f32, heading: f32, from_ms: u64) {
        let ds = sign(distance);
        let hs = sign(heading);

        if ds == 0 || hs == 0 {
            self.reset();
            return;
        }

        let continues = self.streak.count > 0
            && signs_agree(self.last_distance_sign, ds)
            && signs_agree(self.last_heading_sign, hs);

        if continues {
            self.streak.count += 1;
            self.streak.distance += distance;
            self.streak.heading += heading;
        } else {
            self.streak = ArcStreak {
                count: 1,
                distance,
                heading,
                start_ms: from_ms,
            };
        }

        self.last_distance_sign = ds;
        self.last_heading_sign = hs;
    }

    /// Drop the current streak.
    pub fn reset(&mut self) {
        self.streak = ArcStreak::default();
        self.last_distance_sign = 0;
        self.last_heading_sign = 0;
    }

    /// Current streak.
    #[inline]
    pub fn streak(&self) -> &ArcStreak {
        &self.streak
    }

    /// Whether a window with the given accumulated deltas is an arc.
    pub fn qualifies(&self, window_distance: f32, window_heading: f32, config: &ArcSection) -> bool {
        let s = &self.streak;
        if s.count < config.min_streak {
            return false;
        }
        if s.distance.abs() < config.min_distance_mm || s.heading.abs() < config.min_heading_deg {
            return false;
        }

        let ratio = s.ratio(config.ratio_scale_mm_per_deg);
        if ratio < config.ratio_min || ratio > config.ratio_max {
            return false;
        }

        sign(window_distance) == sign(s.distance) && sign(window_heading) == sign(s.heading)
    }
}
