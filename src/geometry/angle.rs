//! Joint angle calculation using ray bearings
//!
//! Calculates the unsigned angle at a vertex joint between the ray
//! vertex→start and the ray vertex→end (e.g. hip→knee←ankle).

use serde::{Deserialize, Serialize};

/// Returned when either limb segment has zero length and no direction exists.
pub const DEGENERATE_ANGLE: f64 = 0.0;

/// Segments shorter than this are treated as zero-length.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// A landmark position in image space (pixels or normalized 0-1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Bearing of the ray from `self` towards `to`, in radians.
    fn bearing_to(self, to: Point2D) -> f64 {
        (to.y - self.y).atan2(to.x - self.x)
    }

    fn distance_to(self, to: Point2D) -> f64 {
        (to.x - self.x).hypot(to.y - self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for (f64, f64) {
    fn from(point: Point2D) -> Self {
        (point.x, point.y)
    }
}

/// Angle at a joint in degrees, always within [0, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngle {
    pub degrees: f64,
    /// Set when the geometry had no defined direction and `degrees` is the
    /// sentinel rather than a measurement.
    pub degenerate: bool,
}

impl JointAngle {
    fn measured(degrees: f64) -> Self {
        Self {
            degrees,
            degenerate: false,
        }
    }

    fn degenerate() -> Self {
        Self {
            degrees: DEGENERATE_ANGLE,
            degenerate: true,
        }
    }
}

/// Calculate the angle at `vertex` between `start` and `end`.
///
/// Returns angle in degrees:
/// - 180° = segments form a straight line (limb extended)
/// - 0°   = segments fold onto each other (limb fully flexed)
///
/// Coincident points yield [`DEGENERATE_ANGLE`] flagged as degenerate.
pub fn joint_angle(start: Point2D, vertex: Point2D, end: Point2D) -> JointAngle {
    if vertex.distance_to(start) < MIN_SEGMENT_LENGTH
        || vertex.distance_to(end) < MIN_SEGMENT_LENGTH
    {
        return JointAngle::degenerate();
    }

    let radians = vertex.bearing_to(end) - vertex.bearing_to(start);
    let degrees = radians.to_degrees().abs();

    if degrees > 180.0 {
        JointAngle::measured(360.0 - degrees)
    } else {
        JointAngle::measured(degrees)
    }
}
