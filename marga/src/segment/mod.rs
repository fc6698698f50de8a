//! Drivebase segmentation.
//!
//! Turns consecutive telemetry samples into drive, turn and arc commands.
//!
//! ```text
//! samples ──► Segmenter ──► raw commands
//!                │  ▲
//!                ▼  │
//!     ArcStabilityTracker   reconcile() on type switch
//! ```
//!
//! - [`Segmenter`]: noise-floor windows, classification and the command state machine
//! - [`ArcStabilityTracker`]: streak of consistent drive+turn deltas
//! - [`reconcile`]: folds leftover deltas into the command that just closed

mod arc;
mod reconcile;
mod segmenter;

pub use arc::{ArcStabilityTracker, ArcStreak};
pub use reconcile::{
    Residual, absorb_distance, absorb_heading, consumes_distance, consumes_heading, reconcile,
};
pub use segmenter::Segmenter;
