pub mod controller;
pub mod timeline;

pub use controller::{FrameOutcome, SessionController, SessionSummary};
pub use timeline::{SessionTimeline, TimelineSample};
