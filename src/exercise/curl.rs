//! Bicep curl detection from both elbow angles
//!
//! Both arms extended arms the counter (`Stage::Down`). Both arms flexed must
//! then be seen on `hold_frames` frames before the rep is credited, which
//! filters single-frame glitches where both elbows momentarily read as bent.
//!
//! The hold counter is only cleared when a rep is credited (or on reset). A
//! frame that fails the flexed test leaves it untouched, so qualifying frames
//! separated by non-qualifying ones still add up. Changing that would change
//! which rep sequences count.

use super::{CurlThresholds, ExerciseDetector, ExerciseKind, RepCounter, RepEvent, Stage};

pub struct CurlDetector {
    thresholds: CurlThresholds,
    counter: RepCounter,
}

impl CurlDetector {
    pub fn new(thresholds: CurlThresholds) -> Self {
        Self {
            thresholds,
            counter: RepCounter::new(ExerciseKind::Curl),
        }
    }

    pub fn hold_frames(&self) -> u32 {
        self.counter.hold_frames
    }
}

impl Default for CurlDetector {
    fn default() -> Self {
        Self::new(CurlThresholds::default())
    }
}

impl ExerciseDetector for CurlDetector {
    /// (left elbow, right elbow)
    type Input = (f64, f64);

    fn update(&mut self, (left, right): (f64, f64)) -> Option<RepEvent> {
        let extended = self.thresholds.extended_above;
        let flexed = self.thresholds.flexed_below;

        if left > extended && right > extended {
            self.counter.stage = Stage::Down;
            return None;
        }

        if left < flexed && right < flexed && self.counter.stage == Stage::Down {
            self.counter.hold_frames += 1;
            if self.counter.hold_frames >= self.thresholds.hold_frames {
                return Some(self.counter.credit(Stage::Up));
            }
        }

        None
    }

    fn counter(&self) -> &RepCounter {
        &self.counter
    }

    fn reset(&mut self) {
        self.counter.reset();
    }
}
