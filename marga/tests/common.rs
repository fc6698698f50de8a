//! Recording builders shared by the integration tests.

#![allow(dead_code)]

use marga::TelemetrySample;

/// Enable `RUST_LOG` output inside tests.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sample with drivebase totals and a matching inertial heading.
pub fn pose(t: u64, distance: f32, heading: f32) -> TelemetrySample {
    TelemetrySample::new(t, 0)
        .with_drivebase(distance, heading)
        .with_heading(heading)
}

/// `n` samples 100 ms apart, each `step` mm further along.
pub fn straight_drive(n: usize, step: f32) -> Vec<TelemetrySample> {
    (0..n)
        .map(|i| pose(i as u64 * 100, i as f32 * step, 0.0))
        .collect()
}

/// `n` samples 100 ms apart with constant distance and heading steps.
pub fn arc_recording(n: usize, distance_step: f32, heading_step: f32) -> Vec<TelemetrySample> {
    (0..n)
        .map(|i| {
            pose(
                i as u64 * 100,
                i as f32 * distance_step,
                i as f32 * heading_step,
            )
        })
        .collect()
}

/// Samples from absolute drivebase distances, 100 ms apart.
pub fn drive_profile(distances: &[f32]) -> Vec<TelemetrySample> {
    distances
        .iter()
        .enumerate()
        .map(|(i, d)| pose(i as u64 * 100, *d, 0.0))
        .collect()
}

/// Drive 40 mm, then turn 90 degrees in place.
pub fn drive_then_turn() -> Vec<TelemetrySample> {
    vec![
        pose(0, 0.0, 0.0),
        pose(100, 20.0, 0.0),
        pose(200, 40.0, 0.0),
        pose(300, 40.0, 90.0),
    ]
}

/// Move every sample into a segment.
pub fn in_segment(samples: Vec<TelemetrySample>, segment_id: u32) -> Vec<TelemetrySample> {
    samples
        .into_iter()
        .map(|mut s| {
            s.segment_id = segment_id;
            s
        })
        .collect()
}

/// Shift every timestamp.
pub fn shifted(samples: Vec<TelemetrySample>, offset_ms: u64) -> Vec<TelemetrySample> {
    samples
        .into_iter()
        .map(|mut s| {
            s.timestamp_ms += offset_ms;
            s
        })
        .collect()
}

/// A long mixed recording: drive, arc, turn, reverse, with an arm motor
/// moving during the drive.
pub fn mixed_recording(repeats: usize) -> Vec<TelemetrySample> {
    let mut samples = Vec::new();
    let mut t = 0u64;
    let mut distance = 0.0f32;
    let mut heading = 0.0f32;
    let mut arm = 0.0f32;

    for _ in 0..repeats {
        for i in 0..20 {
            distance += 8.0;
            if (5..15).contains(&i) {
                arm += 12.0;
            }
            samples.push(
                TelemetrySample::new(t, 0)
                    .with_drivebase(distance, heading)
                    .with_heading(heading)
                    .with_motor("arm", arm, if (5..15).contains(&i) { 120.0 } else { 0.0 }),
            );
            t += 50;
        }
        for _ in 0..10 {
            distance += 15.0;
            heading += 3.0;
            samples.push(pose(t, distance, heading).with_motor("arm", arm, 0.0));
            t += 50;
        }
        for _ in 0..15 {
            heading -= 6.0;
            samples.push(pose(t, distance, heading).with_motor("arm", arm, 0.0));
            t += 50;
        }
        for _ in 0..10 {
            distance -= 10.0;
            samples.push(pose(t, distance, heading).with_motor("arm", arm, 0.0));
            t += 50;
        }
    }
    samples
}
