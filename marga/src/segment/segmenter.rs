//! Telemetry segmentation into drive, turn and arc commands.
//!
//! Every instantaneous delta is accumulated into a window. A boundary fires
//! once the window's distance or heading crosses its noise floor; only then
//! is the movement classified and a command opened, extended, promoted or
//! closed. Single-sample jitter therefore never starts or ends a command on
//! its own.
//!
//! # State machine
//!
//! ```text
//! Idle ──first boundary──► Building(T)
//! Building(T) ──boundary classified T──► Building(T)      (extend)
//! Building(T) ──boundary classified T'─► close T, reconcile, Building(T')
//! Building(T) ──end of segment─────────► Closed           (residue flush)
//! ```

use crate::config::SynthConfig;
use crate::core::math::{heading_delta, normalize_heading, sign, signs_agree};
use crate::core::{CommandKind, CommandType, MovementCommand, TelemetrySample};

use super::arc::ArcStabilityTracker;
use super::reconcile::{Residual, reconcile};

/// Drivebase motion types the segmenter produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Motion {
    Drive,
    Turn,
    Arc,
}

impl From<Motion> for CommandType {
    fn from(motion: Motion) -> Self {
        match motion {
            Motion::Drive => CommandType::Drive,
            Motion::Turn => CommandType::Turn,
            Motion::Arc => CommandType::Arc,
        }
    }
}

/// Deltas accumulated since the last boundary.
#[derive(Clone, Copy, Debug, Default)]
struct Window {
    residual: Residual,
    start_ms: u64,
    end_ms: u64,
    start_heading: f32,
    correction: bool,
}

impl Window {
    fn starting(at_ms: u64, heading: f32) -> Self {
        Self {
            residual: Residual::default(),
            start_ms: at_ms,
            end_ms: at_ms,
            start_heading: heading,
            correction: false,
        }
    }
}

/// Command under construction.
///
/// Both dimensions are kept regardless of type so a drive or turn can be
/// promoted to an arc once the arc streak proves stable.
#[derive(Clone, Debug)]
struct OpenCommand {
    motion: Motion,
    start_ms: u64,
    end_ms: u64,
    start_heading: f32,
    distance: f32,
    heading: f32,
    correction: bool,
    /// Most recently absorbed window.
    last_window: Window,
}

impl OpenCommand {
    fn from_window(motion: Motion, window: &Window) -> Self {
        Self {
            motion,
            start_ms: window.start_ms,
            end_ms: window.end_ms,
            start_heading: window.start_heading,
            distance: window.residual.distance,
            heading: window.residual.heading,
            correction: window.correction,
            last_window: *window,
        }
    }

    /// Whether a window classified as `motion` continues this command.
    fn accepts(&self, motion: Motion, window: &Window) -> bool {
        if motion != self.motion || window.correction != self.correction {
            return false;
        }
        let same_distance = signs_agree(sign(self.distance), sign(window.residual.distance));
        let same_heading = signs_agree(sign(self.heading), sign(window.residual.heading));
        match motion {
            Motion::Drive => same_distance,
            Motion::Turn => same_heading,
            Motion::Arc => same_distance && same_heading,
        }
    }

    fn absorb(&mut self, window: &Window) {
        self.distance += window.residual.distance;
        self.heading += window.residual.heading;
        self.end_ms = window.end_ms;
        self.correction |= window.correction;
        self.last_window = *window;
    }

    /// Detach the last absorbed window when it lies inside an arc streak
    /// starting at `streak_start`.
    ///
    /// The command keeps at least its first window. Returns the detached
    /// window so the arc can start with it.
    fn back_off(&mut self, streak_start: u64) -> Option<Window> {
        let last = self.last_window;
        if last.start_ms < streak_start || last.start_ms <= self.start_ms {
            return None;
        }
        self.distance -= last.residual.distance;
        self.heading -= last.residual.heading;
        self.end_ms = last.start_ms;
        self.last_window = Window::starting(last.start_ms, last.start_heading);
        Some(last)
    }

    fn to_command(&self, segment_id: u32) -> MovementCommand {
        let kind = match self.motion {
            Motion::Drive => CommandKind::drive(self.distance),
            Motion::Turn => CommandKind::turn(self.heading, self.start_heading),
            Motion::Arc => CommandKind::arc(self.distance, self.heading),
        };
        MovementCommand::new(
            self.start_ms,
            self.end_ms.saturating_sub(self.start_ms),
            segment_id,
            kind,
        )
        .with_correction(self.correction)
    }
}

/// Segments drivebase telemetry into drive, turn and arc commands.
///
/// Feed samples in order with [`Segmenter::push`], then call
/// [`Segmenter::finish`]. Closed commands are appended to the shared output
/// list, so emission order interleaves with other trackers writing to it.
///
/// A change of segment id flushes the current segment. The delta across the
/// boundary belongs to neither recording and is dropped.
pub struct Segmenter<'a> {
    config: &'a SynthConfig,
    arc: ArcStabilityTracker,
    window: Window,
    open: Option<OpenCommand>,
    /// Index in the output list of the last command closed in this segment.
    last_closed: Option<usize>,
    last_motion: Option<Motion>,
    segment_id: Option<u32>,
    last_ms: u64,
    last_distance: Option<f32>,
    /// Drivebase angle baseline, cleared when an IMU pairing covers the span.
    last_angle: Option<f32>,
    /// IMU heading of the previous sample only; gaps fall back to drivebase angle.
    last_imu: Option<f32>,
    heading: f32,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter for one synthesis run.
    pub fn new(config: &'a SynthConfig) -> Self {
        Self {
            config,
            arc: ArcStabilityTracker::new(),
            window: Window::default(),
            open: None,
            last_closed: None,
            last_motion: None,
            segment_id: None,
            last_ms: 0,
            last_distance: None,
            last_angle: None,
            last_imu: None,
            heading: 0.0,
        }
    }

    /// Process the next sample.
    pub fn push(&mut self, sample: &TelemetrySample, out: &mut Vec<MovementCommand>) {
        match self.segment_id {
            Some(id) if id == sample.segment_id => {}
            Some(id) => {
                log::debug!(
                    "Segment {} ended at {} ms, starting segment {}",
                    id,
                    sample.timestamp_ms,
                    sample.segment_id
                );
                self.finish(out);
                self.start_segment(sample);
                return;
            }
            None => {
                self.start_segment(sample);
                return;
            }
        }

        let distance = match (self.last_distance, sample.drivebase) {
            (Some(prev), Some(db)) => Some(db.distance - prev),
            _ => None,
        };
        let imu = match (self.last_imu, sample.heading) {
            (Some(prev), Some(now)) => Some(heading_delta(prev, now)),
            _ => None,
        };
        let heading = imu.or_else(|| match (self.last_angle, sample.drivebase) {
            (Some(prev), Some(db)) => Some(heading_delta(prev, db.angle)),
            _ => None,
        });

        if let Some(db) = sample.drivebase {
            self.last_distance = Some(db.distance);
        }
        // A span measured by the IMU must not be measured again by the
        // drivebase angle, so the angle baseline restarts at this sample.
        if imu.is_some() {
            self.last_angle = sample.drivebase.map(|db| db.angle);
        } else if let Some(db) = sample.drivebase {
            self.last_angle = Some(db.angle);
        }
        self.last_imu = sample.heading;
        let from_ms = self.last_ms;
        self.last_ms = sample.timestamp_ms;

        if distance.is_none() && heading.is_none() {
            log::trace!(
                "Skipping pairing at {} ms: no drivebase or heading reading",
                sample.timestamp_ms
            );
            return;
        }

        let d = distance.unwrap_or(0.0);
        let h = heading.unwrap_or(0.0);

        self.heading = match sample.heading {
            Some(absolute) => normalize_heading(absolute),
            None => normalize_heading(self.heading + h),
        };

        self.arc.update(d, h, from_ms);

        self.window.residual.distance += d;
        self.window.residual.heading += h;
        self.window.end_ms = sample.timestamp_ms;
        self.window.correction |= sample.correction;

        let s = &self.config.segment;
        if self.window.residual.distance.abs() >= s.min_distance_mm
            || self.window.residual.heading.abs() >= s.min_heading_deg
        {
            self.fire(out);
        }
    }

    /// Close the open command and flush residue for the current segment.
    pub fn finish(&mut self, out: &mut Vec<MovementCommand>) {
        if let Some(open) = self.open.take() {
            self.close(open, out);
        }

        let mut residual = self.window.residual;
        if !residual.is_zero() {
            if let Some(idx) = self.last_closed {
                let closed = &mut out[idx];
                if reconcile(closed, None, &mut residual) {
                    closed.duration_ms = self.window.end_ms.saturating_sub(closed.start_ms);
                }
            }
            if !residual.is_zero() && self.residue_is_significant(&residual) {
                let motion = if self
                    .arc
                    .qualifies(residual.distance, residual.heading, &self.config.arc)
                {
                    Motion::Arc
                } else {
                    self.by_magnitude(&residual)
                };
                let window = Window {
                    residual,
                    ..self.window
                };
                log::debug!(
                    "Trailing residue {:.2} mm / {:.2} deg becomes a {:?}",
                    residual.distance,
                    residual.heading,
                    motion
                );
                self.close(OpenCommand::from_window(motion, &window), out);
            } else if !residual.is_zero() {
                log::trace!(
                    "Dropping trailing residue {:.2} mm / {:.2} deg",
                    residual.distance,
                    residual.heading
                );
            }
        }

        self.arc.reset();
        self.last_closed = None;
        self.last_motion = None;
        self.window = Window::starting(self.last_ms, self.heading);
    }

    fn start_segment(&mut self, sample: &TelemetrySample) {
        self.segment_id = Some(sample.segment_id);
        self.last_ms = sample.timestamp_ms;
        self.last_distance = sample.drivebase.map(|db| db.distance);
        self.last_angle = sample.drivebase.map(|db| db.angle);
        self.last_imu = sample.heading;
        if let Some(h) = sample.best_heading() {
            self.heading = normalize_heading(h);
        }
        self.arc.reset();
        self.open = None;
        self.last_closed = None;
        self.last_motion = None;
        self.window = Window::starting(sample.timestamp_ms, self.heading);
    }

    /// Handle a boundary: extend, promote or switch the open command.
    fn fire(&mut self, out: &mut Vec<MovementCommand>) {
        let motion = self.classify();
        let streak_start = self.arc.streak().start_ms;
        let window = self.window;

        let promote = matches!(
            &self.open,
            Some(open) if motion == Motion::Arc
                && open.motion != Motion::Arc
                && open.start_ms >= streak_start
        );
        let extend = !promote
            && self
                .open
                .as_ref()
                .is_some_and(|open| open.accepts(motion, &window));

        if !(promote || extend) {
            self.switch(motion, out);
        } else if let Some(open) = self.open.as_mut() {
            if promote {
                log::debug!(
                    "Promoting {:?} started at {} ms to arc",
                    open.motion,
                    open.start_ms
                );
                open.motion = Motion::Arc;
            }
            open.absorb(&window);
        }

        self.window = Window::starting(window.end_ms, self.heading);
    }

    fn switch(&mut self, motion: Motion, out: &mut Vec<MovementCommand>) {
        if motion == Motion::Arc {
            self.hand_streak_to_arc();
        }
        if let Some(open) = self.open.take() {
            self.close(open, out);
        }

        if let Some(idx) = self.last_closed {
            let next = CommandType::from(motion);
            if out[idx].command_type() != next {
                reconcile(&mut out[idx], Some(next), &mut self.window.residual);
            }
        }

        log::debug!(
            "Opening {:?} at {} ms ({:.2} mm, {:.2} deg)",
            motion,
            self.window.start_ms,
            self.window.residual.distance,
            self.window.residual.heading
        );
        self.open = Some(OpenCommand::from_window(motion, &self.window));
    }

    /// Move the streak's first window out of the open drive or turn.
    ///
    /// That window was absorbed before the streak was long enough to qualify
    /// as an arc.
    fn hand_streak_to_arc(&mut self) {
        let streak_start = self.arc.streak().start_ms;
        let Some(open) = self.open.as_mut() else {
            return;
        };
        if open.motion == Motion::Arc {
            return;
        }
        let Some(tail) = open.back_off(streak_start) else {
            return;
        };

        log::trace!(
            "Handing {:.2} mm / {:.2} deg from {:?} to the arc at {} ms",
            tail.residual.distance,
            tail.residual.heading,
            open.motion,
            tail.start_ms
        );
        let window = self.window;
        self.window = Window {
            residual: Residual {
                distance: tail.residual.distance + window.residual.distance,
                heading: tail.residual.heading + window.residual.heading,
            },
            start_ms: tail.start_ms,
            end_ms: window.end_ms,
            start_heading: tail.start_heading,
            correction: tail.correction || window.correction,
        };
    }

    fn close(&mut self, open: OpenCommand, out: &mut Vec<MovementCommand>) {
        let command = open.to_command(self.segment_id.unwrap_or_default());
        log::debug!("Closing {} at {} ms", command.label(), command.start_ms);
        out.push(command);
        self.last_closed = Some(out.len() - 1);
        self.last_motion = Some(open.motion);
    }

    fn classify(&self) -> Motion {
        let w = &self.window.residual;
        if self.arc.qualifies(w.distance, w.heading, &self.config.arc) {
            return Motion::Arc;
        }

        let s = &self.config.segment;
        let distance_significant = w.distance.abs() >= s.min_distance_mm;
        let heading_significant = w.heading.abs() >= s.min_heading_deg;

        match (distance_significant, heading_significant) {
            (true, true) => self.by_magnitude(w),
            (true, false) => Motion::Drive,
            (false, true) => Motion::Turn,
            (false, false) => self.previous_motion().unwrap_or(Motion::Drive),
        }
    }

    /// Drive or turn, whichever is larger once heading is scaled to distance.
    fn by_magnitude(&self, residual: &Residual) -> Motion {
        let scale = self.config.segment.heading_to_distance_mm_per_deg;
        if residual.distance.abs() >= residual.heading.abs() * scale {
            Motion::Drive
        } else {
            Motion::Turn
        }
    }

    fn previous_motion(&self) -> Option<Motion> {
        self.open.as_ref().map(|open| open.motion).or(self.last_motion)
    }

    fn residue_is_significant(&self, residual: &Residual) -> bool {
        let s = &self.config.segment;
        residual.distance.abs() >= s.min_distance_mm * s.residual_fraction
            || residual.heading.abs() >= s.min_heading_deg * s.residual_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn segment(config: &SynthConfig, samples: &[TelemetrySample]) -> Vec<MovementCommand> {
        let mut segmenter = Segmenter::new(config);
        let mut out = Vec::new();
        for s in samples {
            segmenter.push(s, &mut out);
        }
        segmenter.finish(&mut out);
        out
    }

    fn pose(t: u64, distance: f32, heading: f32) -> TelemetrySample {
        TelemetrySample::new(t, 0)
            .with_drivebase(distance, heading)
            .with_heading(heading)
    }

    #[test]
    fn test_drive_then_turn() {
        let config = SynthConfig::default();
        let samples = [
            pose(0, 0.0, 0.0),
            pose(100, 20.0, 0.0),
            pose(200, 40.0, 0.0),
            pose(300, 40.0, 90.0),
        ];
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].command_type(), CommandType::Drive);
        assert_relative_eq!(out[0].distance(), 40.0);
        assert_eq!((out[0].start_ms, out[0].duration_ms), (0, 200));

        match out[1].kind {
            CommandKind::Turn {
                angle,
                start_heading,
                target_heading,
            } => {
                assert_relative_eq!(angle, 90.0);
                assert_relative_eq!(start_heading, 0.0);
                assert_relative_eq!(target_heading, 90.0);
            }
            ref other => panic!("expected turn, got {:?}", other),
        }
        assert_eq!(out[1].start_ms, 200);
    }

    #[test]
    fn test_sub_threshold_tail_folds_into_drive() {
        let config = SynthConfig::default();
        let samples: Vec<_> = (0..6).map(|i| pose(i * 100, i as f32 * 4.0, 0.0)).collect();
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].distance(), 20.0);
        assert_eq!(out[0].duration_ms, 500);
    }

    #[test]
    fn test_arc_promotes_open_drive() {
        let config = SynthConfig::default();
        let samples: Vec<_> = (0..4)
            .map(|i| pose(i * 100, i as f32 * 15.0, i as f32 * 3.0))
            .collect();
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 1);
        match out[0].kind {
            CommandKind::Arc {
                distance,
                angle,
                radius,
                ..
            } => {
                assert_relative_eq!(distance, 45.0);
                assert_relative_eq!(angle, 9.0, epsilon = 1e-4);
                assert_relative_eq!(radius, 45.0 / 9.0f32.to_radians(), epsilon = 1e-2);
            }
            ref other => panic!("expected arc, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_after_drive_takes_its_first_step() {
        let config = SynthConfig::default();
        let samples: Vec<_> = (0..10)
            .map(|i: u64| {
                let arc_steps = i.saturating_sub(4) as f32;
                let straight = i.min(4) as f32;
                pose(i * 100, straight * 15.0 + arc_steps * 15.0, arc_steps * 3.0)
            })
            .collect();
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].command_type(), CommandType::Drive);
        assert_relative_eq!(out[0].distance(), 60.0);
        assert_eq!((out[0].start_ms, out[0].duration_ms), (0, 400));

        assert_eq!(out[1].command_type(), CommandType::Arc);
        assert_eq!((out[1].start_ms, out[1].duration_ms), (400, 500));
        assert_relative_eq!(out[1].distance(), 75.0, epsilon = 1e-3);
        assert_relative_eq!(out[1].heading_change(), 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_imu_span_not_recounted_from_drivebase_angle() {
        let config = SynthConfig::default();
        let samples = [
            TelemetrySample::new(0, 0)
                .with_drivebase(0.0, 0.0)
                .with_heading(0.0),
            TelemetrySample::new(100, 0).with_heading(90.0),
            TelemetrySample::new(200, 0).with_drivebase(0.0, 90.0),
        ];
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].heading_change(), 90.0);
    }

    #[test]
    fn test_heading_wraparound() {
        let config = SynthConfig::default();
        let headings = [355.0, 359.0, 3.0, 7.0];
        let samples: Vec<_> = headings
            .iter()
            .enumerate()
            .map(|(i, h)| TelemetrySample::new(i as u64 * 100, 0).with_heading(*h))
            .collect();
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 1);
        match out[0].kind {
            CommandKind::Turn {
                angle,
                start_heading,
                target_heading,
            } => {
                assert_relative_eq!(angle, 12.0, epsilon = 1e-3);
                assert_relative_eq!(start_heading, -5.0, epsilon = 1e-3);
                assert_relative_eq!(target_heading, 7.0, epsilon = 1e-3);
            }
            ref other => panic!("expected turn, got {:?}", other),
        }
    }

    #[test]
    fn test_segment_change_flushes() {
        let config = SynthConfig::default();
        let samples = [
            pose(0, 0.0, 0.0),
            pose(100, 20.0, 0.0),
            pose(200, 40.0, 0.0),
            TelemetrySample::new(300, 1).with_drivebase(0.0, 0.0),
            TelemetrySample::new(400, 1).with_drivebase(25.0, 0.0),
        ];
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].segment_id, 0);
        assert_relative_eq!(out[0].distance(), 40.0);
        assert_eq!(out[1].segment_id, 1);
        assert_relative_eq!(out[1].distance(), 25.0);
    }

    #[test]
    fn test_gap_uses_last_known_reading() {
        let config = SynthConfig::default();
        let samples = [
            TelemetrySample::new(0, 0).with_drivebase(0.0, 0.0),
            TelemetrySample::new(100, 0).with_drivebase(20.0, 0.0),
            TelemetrySample::new(200, 0),
            TelemetrySample::new(300, 0).with_drivebase(60.0, 0.0),
        ];
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].distance(), 60.0);
    }

    #[test]
    fn test_backward_drive() {
        let config = SynthConfig::default();
        let samples: Vec<_> = (0..4).map(|i| pose(i * 100, i as f32 * -15.0, 0.0)).collect();
        let out = segment(&config, &samples);

        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].distance(), -45.0);
        assert_eq!(out[0].sign(), -1);
    }

    #[test]
    fn test_no_movement() {
        let config = SynthConfig::default();
        let samples: Vec<_> = (0..5).map(|i| pose(i * 100, 0.0, 0.0)).collect();
        assert!(segment(&config, &samples).is_empty());
    }
}
