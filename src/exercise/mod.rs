//! Exercise module - rep counting state machines
//!
//! Re-exports only. All logic in submodules.

mod config;
mod counter;
mod curl;
mod squat;

pub use config::{CurlThresholds, DetectorConfig, SquatThresholds};
pub use counter::{ExerciseKind, RepCounter, RepEvent, Stage};
pub use curl::CurlDetector;
pub use squat::SquatDetector;

/// A per-exercise state machine fed once per processed frame.
pub trait ExerciseDetector {
    /// Joint angles the detector reads each frame, in degrees.
    type Input;

    /// Advance one frame. Returns the rep credited on this frame, if any.
    fn update(&mut self, input: Self::Input) -> Option<RepEvent>;

    fn counter(&self) -> &RepCounter;

    /// Back to the initial state: zero count, idle stage, empty hold.
    fn reset(&mut self);

    fn count(&self) -> u32 {
        self.counter().count
    }

    fn stage(&self) -> Stage {
        self.counter().stage
    }
}
