use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::pose::{parse_stream_line, PoseStreamItem};

use super::WorkoutRunner;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// How a pose stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// A `stop` event was read.
    Stopped,
    /// The stop token was cancelled from elsewhere.
    Cancelled,
    /// Input ran out without a `stop` event.
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: u64,
    pub resets: u64,
    pub skipped_lines: u64,
}

/// Feed a JSON-lines pose stream into an already started runner.
///
/// Malformed lines are logged and skipped. Stopping the session is left to
/// the caller so it can deliver the report.
pub async fn replay_stream<R>(
    runner: &WorkoutRunner,
    reader: R,
) -> Result<(StreamEnd, ReplayStats)>
where
    R: AsyncBufRead + Unpin,
{
    let cancel_token = runner.stop_token();
    let mut lines = reader.lines();
    let mut stats = ReplayStats::default();
    let mut line_no: u64 = 0;

    loop {
        let line = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("pose stream replay cancelled after {} frames", stats.frames);
                return Ok((StreamEnd::Cancelled, stats));
            }
            line = lines.next_line() => line.context("failed to read pose stream")?,
        };

        let Some(line) = line else {
            log_info!("pose stream exhausted after {} frames", stats.frames);
            return Ok((StreamEnd::Exhausted, stats));
        };
        line_no += 1;

        let item = match parse_stream_line(&line) {
            Ok(Some(item)) => item,
            Ok(None) => continue,
            Err(err) => {
                log_warn!("skipping pose stream line {}: {err:#}", line_no);
                stats.skipped_lines += 1;
                continue;
            }
        };

        match item {
            PoseStreamItem::Frame {
                elapsed_ms,
                landmarks,
            } => {
                let elapsed = elapsed_ms.map(Duration::from_millis);
                if let Err(err) = runner.handle_frame(landmarks.as_ref(), elapsed).await {
                    log_error!("frame on line {} failed: {err:?}", line_no);
                    return Err(err);
                }
                stats.frames += 1;
            }
            PoseStreamItem::Reset => {
                runner.reset().await?;
                stats.resets += 1;
            }
            PoseStreamItem::Stop => {
                log_info!("stop event on line {}", line_no);
                return Ok((StreamEnd::Stopped, stats));
            }
        }
    }
}
