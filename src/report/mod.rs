//! End-of-session report payloads
//!
//! Rendering (PDF, charts) and delivery (email) belong to downstream
//! consumers. This module builds the payload they read and writes it as JSON.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    session::{SessionSummary, TimelineSample},
    settings::UserProfile,
};

pub const SUMMARY_FILE: &str = "exercise_summary.json";
pub const TIMELINE_FILE: &str = "timeline.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub profile: UserProfile,
    pub summary: SessionSummary,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    /// Workout length since start or the last reset. Recorded streams use
    /// their own clock (equal to `summary.elapsed_secs`); live sessions use
    /// wall-clock time up to stop.
    pub duration_secs: u64,
    pub timeline: Vec<TimelineSample>,
}

/// Consumer of the finished session report (report renderer, mailer, ...).
pub trait ReportSink {
    fn deliver(&self, report: &SessionReport) -> Result<()>;
}

/// Writes the summary and the timeline as pretty JSON into a directory.
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    pub fn timeline_path(&self) -> PathBuf {
        self.dir.join(TIMELINE_FILE)
    }
}

impl ReportSink for JsonReportWriter {
    fn deliver(&self, report: &SessionReport) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create report directory {}", self.dir.display()))?;

        let summary_path = self.summary_path();
        let serialized = serde_json::to_string_pretty(report)?;
        fs::write(&summary_path, serialized)
            .with_context(|| format!("failed to write report to {}", summary_path.display()))?;

        write_timeline_json(&self.timeline_path(), &report.timeline)?;

        info!(
            "Session {} report written to {}",
            report.session_id,
            summary_path.display()
        );
        Ok(())
    }
}

/// Timeline as `[{"elapsedSecs":..,"squats":..,"curls":..}, ...]` for charting.
pub fn write_timeline_json(path: &std::path::Path, samples: &[TimelineSample]) -> Result<()> {
    let serialized = serde_json::to_string(samples)?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write timeline to {}", path.display()))
}
