//! Per-frame orchestration: angles → detectors → calories → timeline.
//!
//! The controller owns all mutable session state. Callers hand it one frame at
//! a time; each call runs to completion without blocking.

use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    calories::CalorieModel,
    exercise::{
        CurlDetector, DetectorConfig, ExerciseDetector, RepCounter, RepEvent, SquatDetector,
    },
    pose::{PoseSnapshot, LEFT_ELBOW_TRIPLE, RIGHT_ELBOW_TRIPLE, RIGHT_KNEE_TRIPLE},
};

use super::{SessionTimeline, TimelineSample};

/// Counts after a frame, as shown on the overlay and written to the frame log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutcome {
    pub squat_count: u32,
    pub curl_count: u32,
    pub calories: f64,
    /// False when the frame had no usable pose and nothing changed.
    pub processed: bool,
    /// Reps credited on this frame.
    pub reps: Vec<RepEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub squats: u32,
    pub curls: u32,
    pub calories: f64,
    /// Elapsed time at the last processed frame.
    pub elapsed_secs: u64,
}

pub struct SessionController {
    config: DetectorConfig,
    calories: CalorieModel,
    squat: SquatDetector,
    curl: CurlDetector,
    timeline: SessionTimeline,
    /// Start of the elapsed clock; moved forward on reset.
    anchor: Instant,
    /// Stream offset of the first recorded frame since start or reset.
    recorded_origin: Option<Duration>,
    last_outcome: FrameOutcome,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(DetectorConfig::default(), CalorieModel::default())
    }
}

impl SessionController {
    pub fn new(config: DetectorConfig, calories: CalorieModel) -> Self {
        Self {
            squat: SquatDetector::new(config.squat),
            curl: CurlDetector::new(config.curl),
            config,
            calories,
            timeline: SessionTimeline::new(),
            anchor: Instant::now(),
            recorded_origin: None,
            last_outcome: FrameOutcome::default(),
        }
    }

    /// Process a live frame, timing it against the controller's own clock.
    pub fn process_frame(&mut self, snapshot: Option<&PoseSnapshot>) -> FrameOutcome {
        let elapsed = self.anchor.elapsed();
        self.apply_frame(snapshot, elapsed)
    }

    /// Process a frame stamped with a stream offset (recorded streams).
    ///
    /// Offsets are measured from the first frame seen since start or reset,
    /// so a stream whose clock keeps running across a reset starts again at 0.
    pub fn process_frame_at(
        &mut self,
        snapshot: Option<&PoseSnapshot>,
        stream_offset: Duration,
    ) -> FrameOutcome {
        let origin = *self.recorded_origin.get_or_insert(stream_offset);
        self.apply_frame(snapshot, stream_offset.saturating_sub(origin))
    }

    /// Frames with no body, or missing any tracked joint, leave every counter
    /// and the timeline untouched and return the previous counts.
    fn apply_frame(&mut self, snapshot: Option<&PoseSnapshot>, elapsed: Duration) -> FrameOutcome {
        let Some(snapshot) = snapshot else {
            debug!("frame skipped: no pose detected");
            return self.skipped();
        };

        let (Some(knee), Some(left_elbow), Some(right_elbow)) = (
            snapshot.angle(RIGHT_KNEE_TRIPLE),
            snapshot.angle(LEFT_ELBOW_TRIPLE),
            snapshot.angle(RIGHT_ELBOW_TRIPLE),
        ) else {
            debug!(
                "frame skipped: missing joints [{}]",
                snapshot
                    .missing_joints()
                    .iter()
                    .map(|joint| joint.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return self.skipped();
        };

        let ignore_degenerate = self.config.ignore_degenerate_angles;
        let mut reps = Vec::new();

        if ignore_degenerate && knee.degenerate {
            debug!("squat update skipped: degenerate knee geometry");
        } else {
            reps.extend(self.squat.update(knee.degrees));
        }

        if ignore_degenerate && (left_elbow.degenerate || right_elbow.degenerate) {
            debug!("curl update skipped: degenerate elbow geometry");
        } else {
            reps.extend(self.curl.update((left_elbow.degrees, right_elbow.degrees)));
        }

        for rep in &reps {
            info!("{} rep #{} at {}s", rep.kind.as_str(), rep.count, elapsed.as_secs());
        }

        let squats = self.squat.count();
        let curls = self.curl.count();

        self.timeline.append(TimelineSample {
            elapsed_secs: elapsed.as_secs(),
            squats,
            curls,
        });

        self.last_outcome = FrameOutcome {
            squat_count: squats,
            curl_count: curls,
            calories: self.calories.estimate(squats, curls),
            processed: true,
            reps,
        };
        self.last_outcome.clone()
    }

    /// Clear both counters and the timeline; the next frame starts a fresh session.
    pub fn reset(&mut self) {
        self.squat.reset();
        self.curl.reset();
        self.timeline.clear();
        self.anchor = Instant::now();
        self.recorded_origin = None;
        self.last_outcome = FrameOutcome::default();
        info!("session counters reset");
    }

    pub fn summary(&self) -> SessionSummary {
        let squats = self.squat.count();
        let curls = self.curl.count();
        SessionSummary {
            squats,
            curls,
            calories: self.calories.estimate(squats, curls),
            elapsed_secs: self.timeline.last().map_or(0, |sample| sample.elapsed_secs),
        }
    }

    pub fn squat_counter(&self) -> &RepCounter {
        self.squat.counter()
    }

    pub fn curl_counter(&self) -> &RepCounter {
        self.curl.counter()
    }

    pub fn timeline(&self) -> &SessionTimeline {
        &self.timeline
    }

    pub fn calorie_model(&self) -> &CalorieModel {
        &self.calories
    }

    pub fn last_outcome(&self) -> &FrameOutcome {
        &self.last_outcome
    }

    fn skipped(&self) -> FrameOutcome {
        FrameOutcome {
            processed: false,
            reps: Vec::new(),
            ..self.last_outcome.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{ExerciseKind, Stage};
    use crate::geometry::Point2D;
    use crate::pose::Joint;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Ray endpoints around a vertex at `origin` forming `degrees`.
    fn limb(origin: (f64, f64), degrees: f64) -> (Point2D, Point2D, Point2D) {
        let radians = degrees.to_radians();
        (
            Point2D::new(origin.0 + 100.0, origin.1),
            Point2D::new(origin.0, origin.1),
            Point2D::new(origin.0 + 100.0 * radians.cos(), origin.1 + 100.0 * radians.sin()),
        )
    }

    fn pose(knee: f64, left_elbow: f64, right_elbow: f64) -> PoseSnapshot {
        let (hip, knee_pt, ankle) = limb((400.0, 600.0), knee);
        let (rs, re, rw) = limb((300.0, 300.0), right_elbow);
        let (ls, le, lw) = limb((500.0, 300.0), left_elbow);

        PoseSnapshot::new()
            .with_joint(Joint::RightHip, hip)
            .with_joint(Joint::RightKnee, knee_pt)
            .with_joint(Joint::RightAnkle, ankle)
            .with_joint(Joint::RightShoulder, rs)
            .with_joint(Joint::RightElbow, re)
            .with_joint(Joint::RightWrist, rw)
            .with_joint(Joint::LeftShoulder, ls)
            .with_joint(Joint::LeftElbow, le)
            .with_joint(Joint::LeftWrist, lw)
    }

    fn jitter(rng: &mut StdRng, spread: f64) -> f64 {
        rng.gen_range(-spread..spread)
    }

    fn run(controller: &mut SessionController, frames: &[(f64, f64, f64)]) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        for (i, (knee, left, right)) in frames.iter().enumerate() {
            outcome = controller.process_frame_at(
                Some(&pose(*knee, *left, *right)),
                Duration::from_millis(i as u64 * 500),
            );
        }
        outcome
    }

    #[test]
    fn test_squat_and_curl_counted_in_same_session() {
        let mut controller = SessionController::default();
        let outcome = run(
            &mut controller,
            &[
                (170.0, 160.0, 160.0),
                (65.0, 50.0, 50.0),
                (65.0, 50.0, 50.0),
                (65.0, 50.0, 50.0),
                (170.0, 160.0, 160.0),
                (65.0, 100.0, 100.0),
            ],
        );

        assert_eq!(outcome.squat_count, 2);
        assert_eq!(outcome.curl_count, 1);
        assert_eq!(outcome.calories, 11.81);
        assert!(outcome.processed);
        assert_eq!(controller.timeline().len(), 6);
        assert_eq!(controller.squat_counter().stage, Stage::Down);
        assert_eq!(controller.curl_counter().stage, Stage::Down);
    }

    #[test]
    fn test_rep_events_reported_on_crediting_frame() {
        let mut controller = SessionController::default();
        let armed = controller.process_frame_at(Some(&pose(170.0, 120.0, 120.0)), Duration::ZERO);
        assert!(armed.reps.is_empty());

        let credited =
            controller.process_frame_at(Some(&pose(65.0, 120.0, 120.0)), Duration::from_secs(1));
        assert_eq!(credited.reps.len(), 1);
        assert_eq!(credited.reps[0].kind, ExerciseKind::Squat);
        assert_eq!(credited.reps[0].count, 1);
    }

    #[test]
    fn test_missing_pose_is_a_no_op() {
        let mut controller = SessionController::default();
        run(&mut controller, &[(170.0, 160.0, 160.0), (65.0, 160.0, 160.0)]);
        let before = controller.summary();

        let outcome = controller.process_frame_at(None, Duration::from_secs(9));
        assert!(!outcome.processed);
        assert_eq!(outcome.squat_count, 1);
        assert_eq!(outcome.calories, 4.38);
        assert_eq!(controller.timeline().len(), 2);
        assert_eq!(controller.summary(), before);
    }

    #[test]
    fn test_incomplete_pose_is_a_no_op() {
        let mut controller = SessionController::default();
        let partial = PoseSnapshot::new()
            .with_joint(Joint::RightHip, (0.0, 0.0))
            .with_joint(Joint::RightKnee, (0.0, 1.0))
            .with_joint(Joint::RightAnkle, (0.0, 2.0));

        let outcome = controller.process_frame_at(Some(&partial), Duration::ZERO);
        assert!(!outcome.processed);
        assert!(controller.timeline().is_empty());
        assert_eq!(controller.squat_counter().stage, Stage::Idle);
    }

    #[test]
    fn test_timeline_tracks_elapsed_seconds() {
        let mut controller = SessionController::default();
        controller.process_frame_at(Some(&pose(170.0, 160.0, 160.0)), Duration::from_millis(200));
        controller.process_frame_at(Some(&pose(65.0, 160.0, 160.0)), Duration::from_millis(2_900));

        let samples = controller.timeline().samples();
        assert_eq!(
            samples,
            &[
                TimelineSample {
                    elapsed_secs: 0,
                    squats: 0,
                    curls: 0
                },
                TimelineSample {
                    elapsed_secs: 2,
                    squats: 1,
                    curls: 0
                },
            ]
        );
        assert_eq!(controller.summary().elapsed_secs, 2);
    }

    #[test]
    fn test_reset_behaves_like_fresh_session() {
        let frames = [
            (170.0, 160.0, 160.0),
            (65.0, 50.0, 50.0),
            (100.0, 50.0, 50.0),
            (100.0, 50.0, 50.0),
        ];

        let mut controller = SessionController::default();
        run(&mut controller, &frames);
        // Leave a partial curl hold behind.
        run(&mut controller, &[(170.0, 160.0, 160.0), (170.0, 50.0, 50.0)]);
        assert_eq!(controller.curl_counter().hold_frames, 1);

        controller.reset();
        assert_eq!(controller.squat_counter(), &RepCounter::new(ExerciseKind::Squat));
        assert_eq!(controller.curl_counter(), &RepCounter::new(ExerciseKind::Curl));
        assert!(controller.timeline().is_empty());
        assert_eq!(controller.summary().squats, 0);
        assert_eq!(controller.last_outcome(), &FrameOutcome::default());

        let mut fresh = SessionController::default();
        assert_eq!(run(&mut controller, &frames), run(&mut fresh, &frames));
        assert_eq!(controller.timeline().samples(), fresh.timeline().samples());
    }

    #[test]
    fn test_reset_restarts_recorded_clock() {
        let mut controller = SessionController::default();
        controller.process_frame_at(Some(&pose(170.0, 160.0, 160.0)), Duration::ZERO);
        controller.process_frame_at(Some(&pose(65.0, 160.0, 160.0)), Duration::from_secs(1));

        controller.reset();
        controller.process_frame_at(Some(&pose(170.0, 160.0, 160.0)), Duration::from_secs(5));
        controller
            .process_frame_at(Some(&pose(65.0, 160.0, 160.0)), Duration::from_millis(7_400));

        let elapsed: Vec<_> = controller
            .timeline()
            .samples()
            .iter()
            .map(|sample| sample.elapsed_secs)
            .collect();
        assert_eq!(elapsed, vec![0, 2]);
        assert_eq!(controller.summary().elapsed_secs, 2);
        assert_eq!(controller.summary().squats, 1);
    }

    #[test]
    fn test_recorded_clock_starts_at_first_frame() {
        let mut controller = SessionController::default();
        controller.process_frame_at(None, Duration::from_secs(30));
        controller.process_frame_at(Some(&pose(170.0, 160.0, 160.0)), Duration::from_secs(33));

        assert_eq!(controller.summary().elapsed_secs, 3);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let mut controller = SessionController::default();
        run(&mut controller, &[(170.0, 160.0, 160.0), (65.0, 50.0, 50.0)]);
        assert_eq!(controller.summary(), controller.summary());
    }

    #[test]
    fn test_degenerate_knee_counts_unless_ignored() {
        let collapsed = |mut snapshot: PoseSnapshot| {
            snapshot.insert(Joint::RightHip, (400.0, 600.0));
            snapshot.insert(Joint::RightAnkle, (400.0, 600.0));
            snapshot
        };

        let mut faithful = SessionController::default();
        faithful.process_frame_at(Some(&pose(170.0, 120.0, 120.0)), Duration::ZERO);
        let outcome =
            faithful.process_frame_at(Some(&collapsed(pose(170.0, 120.0, 120.0))), Duration::ZERO);
        assert_eq!(outcome.squat_count, 1);

        let config = DetectorConfig {
            ignore_degenerate_angles: true,
            ..DetectorConfig::default()
        };
        let mut guarded = SessionController::new(config, CalorieModel::default());
        guarded.process_frame_at(Some(&pose(170.0, 120.0, 120.0)), Duration::ZERO);
        let outcome =
            guarded.process_frame_at(Some(&collapsed(pose(170.0, 120.0, 120.0))), Duration::ZERO);
        assert_eq!(outcome.squat_count, 0);
        assert!(outcome.processed);
        assert_eq!(guarded.squat_counter().stage, Stage::Up);
    }

    #[test]
    fn test_jitter_in_dead_zone_never_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut controller = SessionController::default();
        let frames: Vec<_> = (0..500)
            .map(|_| {
                (
                    115.0 + jitter(&mut rng, 40.0),
                    105.0 + jitter(&mut rng, 40.0),
                    105.0 + jitter(&mut rng, 40.0),
                )
            })
            .collect();

        let outcome = run(&mut controller, &frames);
        assert_eq!(outcome.squat_count, 0);
        assert_eq!(outcome.curl_count, 0);
    }

    #[test]
    fn test_noisy_cycles_count_once_each() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut controller = SessionController::default();
        let mut frames = Vec::new();

        for _ in 0..5 {
            for _ in 0..15 {
                frames.push((
                    172.0 + jitter(&mut rng, 6.0),
                    165.0 + jitter(&mut rng, 8.0),
                    165.0 + jitter(&mut rng, 8.0),
                ));
            }
            for _ in 0..15 {
                frames.push((
                    45.0 + jitter(&mut rng, 15.0),
                    35.0 + jitter(&mut rng, 15.0),
                    35.0 + jitter(&mut rng, 15.0),
                ));
            }
        }

        let outcome = run(&mut controller, &frames);
        assert_eq!(outcome.squat_count, 5);
        assert_eq!(outcome.curl_count, 5);
    }
}
