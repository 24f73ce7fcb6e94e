//! Pose module - landmark snapshots from the external estimator
//!
//! Re-exports only. All logic in submodules.

mod snapshot;
mod stream;

pub use snapshot::{
    Joint, JointTriple, PoseSnapshot, LEFT_ELBOW_TRIPLE, REQUIRED_JOINTS, RIGHT_ELBOW_TRIPLE,
    RIGHT_KNEE_TRIPLE,
};
pub use stream::{parse_stream_line, PoseStreamItem};
