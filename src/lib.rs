pub mod calories;
pub mod db;
pub mod exercise;
pub mod geometry;
pub mod pose;
pub mod report;
pub mod session;
pub mod settings;
mod utils;
pub mod workout;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use db::Database;
use log::{info, warn};
use report::{JsonReportWriter, ReportSink};
use settings::{SettingsStore, ENV_RECEIVER_EMAIL, ENV_USER_AGE, ENV_USER_NAME};
use tokio::io::{AsyncBufRead, BufReader};
use workout::{replay_stream, StreamEnd, WorkoutRunner};

pub use calories::{calories, CalorieModel};
pub use exercise::{DetectorConfig, ExerciseKind, RepCounter, Stage};
pub use geometry::{joint_angle, JointAngle, Point2D};
pub use pose::{Joint, PoseSnapshot};
pub use session::{FrameOutcome, SessionController, SessionSummary, TimelineSample};

const DEFAULT_DATA_DIR: &str = "./repcount-data";

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Count reps from a JSON-lines pose stream (`REPCOUNT_POSE_FILE` or stdin)
/// and write the session report into the data directory.
pub fn run() -> anyhow::Result<()> {
    let level = if env_flag("REPCOUNT_DEBUG") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("RepCount starting up...");

    let data_dir = std::env::var("REPCOUNT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let database = Database::new(data_dir.join("repcount.sqlite3"))?;
    info!("Recording sessions to {}", database.path().display());

    let settings = SettingsStore::new(data_dir.join("settings.json"))?;
    settings.apply_overrides(|name| std::env::var(name).ok())?;
    if settings.ensure_file()? {
        info!("Wrote default settings to {}", settings.path().display());
    }

    let detector = settings.detector_config();
    detector.validate()?;
    let calorie_model = settings.calorie_model();
    calorie_model.validate()?;
    let profile = settings.profile();
    profile.validate().with_context(|| {
        format!(
            "profile incomplete: set {ENV_USER_NAME}, {ENV_USER_AGE}, {ENV_RECEIVER_EMAIL} or edit {}",
            settings.path().display()
        )
    })?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        // Finalize workouts that were running when the process last died.
        if let Some(session) = database.get_incomplete_session().await? {
            warn!(
                "Recovered incomplete session {}; marking as Interrupted",
                session.id
            );
            database
                .mark_session_interrupted(&session.id, Utc::now())
                .await?;
        }

        let runner = WorkoutRunner::new(database.clone(), detector, calorie_model);
        runner.start(profile).await?;

        let pose_file = std::env::var("REPCOUNT_POSE_FILE");
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = match pose_file {
            Ok(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("failed to open pose stream {path}"))?;
                Box::new(BufReader::new(file))
            }
            Err(_) => Box::new(BufReader::new(tokio::io::stdin())),
        };

        let (end, stats) = replay_stream(&runner, reader).await?;
        if end == StreamEnd::Exhausted {
            info!("pose stream ended without a stop event; finishing session");
        }
        info!(
            "{} frames read, {} resets, {} malformed lines skipped",
            stats.frames, stats.resets, stats.skipped_lines
        );

        let report = runner.stop().await?;
        JsonReportWriter::new(data_dir).deliver(&report)?;

        info!(
            "Workout finished: {} squats, {} curls, {:.2} kcal",
            report.summary.squats, report.summary.curls, report.summary.calories
        );
        Ok::<(), anyhow::Error>(())
    })
}
