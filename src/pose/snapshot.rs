//! Landmark storage for a single frame
//!
//! Holds the subset of pose landmarks the rep counters read. Coordinates are
//! passed through untouched (pixels or normalized, whatever the estimator emits).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{joint_angle, JointAngle, Point2D};

// ============================================================================
// JOINT IDENTIFIERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    RightHip,
    RightKnee,
    RightAnkle,
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
}

impl Joint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::RightHip => "right_hip",
            Joint::RightKnee => "right_knee",
            Joint::RightAnkle => "right_ankle",
            Joint::RightShoulder => "right_shoulder",
            Joint::RightElbow => "right_elbow",
            Joint::RightWrist => "right_wrist",
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::LeftWrist => "left_wrist",
        }
    }
}

/// Every joint a frame must carry before it is processed.
pub const REQUIRED_JOINTS: [Joint; 9] = [
    Joint::RightHip,
    Joint::RightKnee,
    Joint::RightAnkle,
    Joint::RightShoulder,
    Joint::RightElbow,
    Joint::RightWrist,
    Joint::LeftShoulder,
    Joint::LeftElbow,
    Joint::LeftWrist,
];

/// Three joints whose middle member is the vertex of the measured angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriple {
    pub start: Joint,
    pub vertex: Joint,
    pub end: Joint,
}

pub const RIGHT_KNEE_TRIPLE: JointTriple = JointTriple {
    start: Joint::RightHip,
    vertex: Joint::RightKnee,
    end: Joint::RightAnkle,
};

pub const RIGHT_ELBOW_TRIPLE: JointTriple = JointTriple {
    start: Joint::RightShoulder,
    vertex: Joint::RightElbow,
    end: Joint::RightWrist,
};

pub const LEFT_ELBOW_TRIPLE: JointTriple = JointTriple {
    start: Joint::LeftShoulder,
    vertex: Joint::LeftElbow,
    end: Joint::LeftWrist,
};

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Joint positions detected in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseSnapshot {
    joints: HashMap<Joint, Point2D>,
}

impl PoseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joint(mut self, joint: Joint, point: impl Into<Point2D>) -> Self {
        self.insert(joint, point);
        self
    }

    pub fn insert(&mut self, joint: Joint, point: impl Into<Point2D>) {
        self.joints.insert(joint, point.into());
    }

    pub fn get(&self, joint: Joint) -> Option<Point2D> {
        self.joints.get(&joint).copied()
    }

    /// True when every joint in [`REQUIRED_JOINTS`] is present.
    pub fn is_complete(&self) -> bool {
        REQUIRED_JOINTS.iter().all(|joint| self.joints.contains_key(joint))
    }

    /// Missing required joints, in declaration order.
    pub fn missing_joints(&self) -> Vec<Joint> {
        REQUIRED_JOINTS
            .iter()
            .copied()
            .filter(|joint| !self.joints.contains_key(joint))
            .collect()
    }

    /// Angle at the triple's vertex, or `None` if any of its joints is missing.
    pub fn angle(&self, triple: JointTriple) -> Option<JointAngle> {
        Some(joint_angle(
            self.get(triple.start)?,
            self.get(triple.vertex)?,
            self.get(triple.end)?,
        ))
    }
}

impl FromIterator<(Joint, Point2D)> for PoseSnapshot {
    fn from_iter<I: IntoIterator<Item = (Joint, Point2D)>>(iter: I) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}
