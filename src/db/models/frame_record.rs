//! Frame log data model.
//!
//! One row per processed frame, written whether or not a rep was credited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    pub id: Option<i64>,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub elapsed_secs: u64,
    pub squats: u32,
    pub curls: u32,
    pub calories: f64,
}
