//! Squat detection from the right knee angle
//!
//! Standing (knee above the extended threshold) arms the counter; dropping
//! below the flexed threshold from there credits the rep. The band between the
//! two thresholds is a dead zone, so no debounce is needed.

use super::{ExerciseDetector, ExerciseKind, RepCounter, RepEvent, SquatThresholds, Stage};

pub struct SquatDetector {
    thresholds: SquatThresholds,
    counter: RepCounter,
}

impl SquatDetector {
    pub fn new(thresholds: SquatThresholds) -> Self {
        Self {
            thresholds,
            counter: RepCounter::new(ExerciseKind::Squat),
        }
    }
}

impl Default for SquatDetector {
    fn default() -> Self {
        Self::new(SquatThresholds::default())
    }
}

impl ExerciseDetector for SquatDetector {
    /// Hip-knee-ankle angle
    type Input = f64;

    fn update(&mut self, knee_angle: f64) -> Option<RepEvent> {
        if knee_angle > self.thresholds.extended_above {
            self.counter.stage = Stage::Up;
            None
        } else if knee_angle < self.thresholds.flexed_below && self.counter.stage == Stage::Up {
            Some(self.counter.credit(Stage::Down))
        } else {
            None
        }
    }

    fn counter(&self) -> &RepCounter {
        &self.counter
    }

    fn reset(&mut self) {
        self.counter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut SquatDetector, angles: &[f64]) -> usize {
        angles
            .iter()
            .filter_map(|angle| detector.update(*angle))
            .count()
    }

    #[test]
    fn test_stand_then_squat_counts_once() {
        let mut detector = SquatDetector::default();

        assert_eq!(detector.update(170.0), None);
        assert_eq!(detector.stage(), Stage::Up);

        let event = detector.update(65.0).unwrap();
        assert_eq!(event.kind, ExerciseKind::Squat);
        assert_eq!(event.count, 1);
        assert_eq!(detector.count(), 1);
        assert_eq!(detector.stage(), Stage::Down);

        feed(&mut detector, &[170.0, 65.0]);
        assert_eq!(detector.count(), 2);
    }

    #[test]
    fn test_never_standing_never_counts() {
        let mut detector = SquatDetector::default();
        feed(&mut detector, &[150.0, 60.0, 100.0, 40.0, 159.9, 10.0]);
        assert_eq!(detector.count(), 0);
        assert_eq!(detector.stage(), Stage::Idle);
    }

    #[test]
    fn test_staying_down_does_not_double_count() {
        let mut detector = SquatDetector::default();
        feed(&mut detector, &[170.0, 65.0, 60.0, 50.0, 69.0, 100.0, 65.0]);
        assert_eq!(detector.count(), 1);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut detector = SquatDetector::default();
        feed(&mut detector, &[160.0, 65.0]);
        assert_eq!(detector.count(), 0);

        feed(&mut detector, &[160.1, 70.0]);
        assert_eq!(detector.count(), 0);
        assert_eq!(detector.stage(), Stage::Up);

        feed(&mut detector, &[69.9]);
        assert_eq!(detector.count(), 1);
    }

    #[test]
    fn test_monotonic_descent_counts_exactly_once() {
        let mut detector = SquatDetector::default();
        let descent: Vec<f64> = (0..=180).rev().map(f64::from).collect();
        assert_eq!(feed(&mut detector, &descent), 1);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut detector = SquatDetector::default();
        feed(&mut detector, &[170.0, 65.0, 170.0]);
        detector.reset();

        assert_eq!(detector.count(), 0);
        assert_eq!(detector.stage(), Stage::Idle);
        assert_eq!(detector.update(65.0), None);
    }
}
