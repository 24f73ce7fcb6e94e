//! Geometry module - joint angles from 2D landmark positions
//!
//! Re-exports only. All logic in submodules.

mod angle;

pub use angle::{joint_angle, JointAngle, Point2D, DEGENERATE_ANGLE};
