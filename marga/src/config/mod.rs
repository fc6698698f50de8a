//! Configuration for the synthesis pipeline.
//!
//! All thresholds are passed explicitly into each call. There is no global
//! or cached configuration, so repeated runs over a growing recording are
//! reproducible.
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`SegmentSection`] | Noise floor and drive/turn classification |
//! | [`ArcSection`] | Arc stability and radius plausibility band |
//! | [`MotorSection`] | Per-motor run detection, drivebase motor names |
//! | [`RenderOptions`] | Pseudocode output mode |
//!
//! ## Example YAML
//!
//! ```yaml
//! segment:
//!   min_distance_mm: 10.0           # boundary after 1cm
//!   min_heading_deg: 5.0            # or after 5 degrees
//!   heading_to_distance_mm_per_deg: 2.5
//!
//! arc:
//!   min_streak: 2
//!   ratio_min: 0.4
//!   ratio_max: 2.0
//!
//! motor:
//!   drivebase_motors: [left, right]
//!
//! render:
//!   heading_mode: absolute          # or relative
//! ```

mod arc;
mod defaults;
mod motor;
mod render;
mod segment;
mod synth;

pub use arc::ArcSection;
pub use motor::MotorSection;
pub use render::{HeadingMode, RenderOptions};
pub use segment::SegmentSection;
pub use synth::SynthConfig;
