//! Per-motor run detection.
//!
//! Each named motor is tracked independently of the drivebase. A run opens
//! when the shaft moves more than `start_threshold_deg` between samples and
//! keeps accumulating while the motion keeps its sign. A run closes when
//!
//! - the shaft reverses (a new run may open on the same sample), or
//! - the motor reports a speed at or below `stop_speed_deg_s` while the
//!   delta is small, or
//! - the segment or stream ends.
//!
//! Runs whose total angle does not exceed `min_angle_deg` are discarded.
//!
//! Motors named in `drivebase_motors` are skipped for every pairing that is
//! also covered by drivebase telemetry, so their rotation is not reported a
//! second time as motor runs.

use std::collections::BTreeMap;

use crate::config::MotorSection;
use crate::core::math::sign;
use crate::core::{CommandKind, MovementCommand, TelemetrySample};

/// Run in progress for one motor.
#[derive(Clone, Debug)]
struct OpenRun {
    start_ms: u64,
    last_ms: u64,
    start_angle: f32,
    angle: f32,
    sign: i8,
    correction: bool,
}

/// Tracking state for one motor.
#[derive(Clone, Debug, Default)]
struct MotorChannel {
    /// Last seen (timestamp, angle).
    baseline: Option<(u64, f32)>,
    run: Option<OpenRun>,
}

/// Detects motor runs for every named motor in the telemetry.
pub struct MotorSegmentTracker<'a> {
    config: &'a MotorSection,
    channels: BTreeMap<String, MotorChannel>,
    segment_id: Option<u32>,
    previous_had_drivebase: bool,
}

impl<'a> MotorSegmentTracker<'a> {
    /// Create a tracker for one synthesis run.
    pub fn new(config: &'a MotorSection) -> Self {
        Self {
            config,
            channels: BTreeMap::new(),
            segment_id: None,
            previous_had_drivebase: false,
        }
    }

    /// Process the next sample.
    pub fn push(&mut self, sample: &TelemetrySample, out: &mut Vec<MovementCommand>) {
        if self.segment_id.is_some_and(|id| id != sample.segment_id) {
            self.finish(out);
            self.channels.clear();
        }
        self.segment_id = Some(sample.segment_id);

        let drivebase_pair = self.previous_had_drivebase && sample.drivebase.is_some();
        self.previous_had_drivebase = sample.drivebase.is_some();

        for (name, reading) in &sample.motors {
            let channel = self.channels.entry(name.clone()).or_default();
            let previous = channel
                .baseline
                .replace((sample.timestamp_ms, reading.angle));
            let Some((last_ms, last_angle)) = previous else {
                continue;
            };

            if drivebase_pair && self.config.is_drivebase_motor(name) {
                if let Some(run) = channel.run.take() {
                    emit(self.config, name, sample.segment_id, run, out);
                }
                continue;
            }

            let delta = reading.angle - last_angle;
            let small = delta.abs() <= self.config.start_threshold_deg;
            let delta_sign = sign(delta);

            let reversed = channel
                .run
                .as_ref()
                .is_some_and(|run| !small && delta_sign != 0 && delta_sign != run.sign);
            if reversed {
                if let Some(run) = channel.run.take() {
                    log::debug!("Motor '{}' reversed at {} ms", name, sample.timestamp_ms);
                    emit(self.config, name, sample.segment_id, run, out);
                }
            }

            match channel.run.as_mut() {
                Some(run) => {
                    run.angle += delta;
                    run.last_ms = sample.timestamp_ms;
                    run.correction |= sample.correction;

                    if small && reading.speed.abs() <= self.config.stop_speed_deg_s {
                        if let Some(run) = channel.run.take() {
                            emit(self.config, name, sample.segment_id, run, out);
                        }
                    }
                }
                None if !small => {
                    channel.run = Some(OpenRun {
                        start_ms: last_ms,
                        last_ms: sample.timestamp_ms,
                        start_angle: last_angle,
                        angle: delta,
                        sign: delta_sign,
                        correction: sample.correction,
                    });
                }
                None => {}
            }
        }
    }

    /// Close every open run.
    pub fn finish(&mut self, out: &mut Vec<MovementCommand>) {
        let segment_id = self.segment_id.unwrap_or_default();
        for (name, channel) in self.channels.iter_mut() {
            if let Some(run) = channel.run.take() {
                emit(self.config, name, segment_id, run, out);
            }
        }
    }
}

fn emit(
    config: &MotorSection,
    name: &str,
    segment_id: u32,
    run: OpenRun,
    out: &mut Vec<MovementCommand>,
) {
    if run.angle.abs() <= config.min_angle_deg {
        log::trace!(
            "Discarding motor '{}' run of {:.2} deg at {} ms",
            name,
            run.angle,
            run.start_ms
        );
        return;
    }

    let duration_ms = run.last_ms.saturating_sub(run.start_ms);
    let command = MovementCommand::new(
        run.start_ms,
        duration_ms,
        segment_id,
        CommandKind::motor_run(name, run.start_angle, run.angle, duration_ms),
    )
    .with_correction(run.correction);

    log::debug!("Closing {} at {} ms", command.label(), command.start_ms);
    out.push(command);
}
