//! JSON-lines pose stream
//!
//! One object per line, tagged by `type`:
//!
//! ```text
//! {"type":"frame","elapsed_ms":1500,"landmarks":{"right_hip":[412.0,388.5], ...}}
//! {"type":"frame","elapsed_ms":1533}
//! {"type":"reset"}
//! {"type":"stop"}
//! ```
//!
//! A frame without `landmarks` means the estimator found no body.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::PoseSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoseStreamItem {
    Frame {
        /// Milliseconds since the stream started; live clock is used when absent.
        #[serde(default)]
        elapsed_ms: Option<u64>,
        #[serde(default)]
        landmarks: Option<PoseSnapshot>,
    },
    Reset,
    Stop,
}

/// Parse one stream line. Blank lines yield `Ok(None)`.
pub fn parse_stream_line(line: &str) -> Result<Option<PoseStreamItem>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .with_context(|| format!("invalid pose stream line: {trimmed}"))
}
