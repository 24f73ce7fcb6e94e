use std::{
    sync::{Arc, Mutex as StdMutex, MutexGuard},
    time::Duration,
};

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    calories::CalorieModel,
    db::{Database, FrameRecord, Session, SessionStatus},
    exercise::DetectorConfig,
    pose::PoseSnapshot,
    report::SessionReport,
    session::{FrameOutcome, SessionController},
    settings::UserProfile,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone)]
struct ActiveSession {
    id: String,
    profile: UserProfile,
    started_at: DateTime<Utc>,
    /// Moved forward on reset so the reported duration covers the fresh session.
    counted_from: DateTime<Utc>,
    /// Set once a frame arrives with a stream offset.
    recorded: bool,
}

/// Drives one workout at a time: frames in, counts out, every processed frame
/// persisted.
#[derive(Clone)]
pub struct WorkoutRunner {
    controller: Arc<Mutex<SessionController>>,
    active: Arc<Mutex<Option<ActiveSession>>>,
    db: Database,
    outcome_tx: Arc<watch::Sender<FrameOutcome>>,
    /// Replaced on every start; cancelled by stop.
    stop_token: Arc<StdMutex<CancellationToken>>,
}

impl WorkoutRunner {
    pub fn new(db: Database, config: DetectorConfig, calories: CalorieModel) -> Self {
        let (outcome_tx, _) = watch::channel(FrameOutcome::default());
        Self {
            controller: Arc::new(Mutex::new(SessionController::new(config, calories))),
            active: Arc::new(Mutex::new(None)),
            db,
            outcome_tx: Arc::new(outcome_tx),
            stop_token: Arc::new(StdMutex::new(CancellationToken::new())),
        }
    }

    /// Latest counts for the overlay.
    pub fn subscribe(&self) -> watch::Receiver<FrameOutcome> {
        self.outcome_tx.subscribe()
    }

    /// Token of the current session, cancelled once that session is stopped.
    pub fn stop_token(&self) -> CancellationToken {
        self.token_slot().clone()
    }

    fn token_slot(&self) -> MutexGuard<'_, CancellationToken> {
        match self.stop_token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub async fn session_id(&self) -> Option<String> {
        self.active.lock().await.as_ref().map(|session| session.id.clone())
    }

    pub async fn start(&self, profile: UserProfile) -> Result<String> {
        profile.validate()?;

        let mut active = self.active.lock().await;
        if active.is_some() {
            bail!("workout already active");
        }

        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();

        self.db
            .insert_session(&Session {
                id: session_id.clone(),
                started_at,
                stopped_at: None,
                status: SessionStatus::Running,
                user_name: Some(profile.name.clone()),
                user_age: profile.age,
                squats: 0,
                curls: 0,
                calories: 0.0,
                duration_secs: 0,
                created_at: started_at,
                updated_at: started_at,
            })
            .await?;

        self.controller.lock().await.reset();
        let _ = self.outcome_tx.send(FrameOutcome::default());
        *self.token_slot() = CancellationToken::new();

        *active = Some(ActiveSession {
            id: session_id.clone(),
            profile,
            started_at,
            counted_from: started_at,
            recorded: false,
        });

        log_info!("Workout session {} started", session_id);
        Ok(session_id)
    }

    /// Feed one frame. `elapsed` comes from recorded streams; live frames use
    /// the controller clock.
    pub async fn handle_frame(
        &self,
        snapshot: Option<&PoseSnapshot>,
        elapsed: Option<Duration>,
    ) -> Result<FrameOutcome> {
        let session_id = {
            let mut active = self.active.lock().await;
            let session = active.as_mut().ok_or_else(|| anyhow!("no active workout"))?;
            session.recorded |= elapsed.is_some();
            session.id.clone()
        };

        let mut controller = self.controller.lock().await;
        let outcome = match elapsed {
            Some(elapsed) => controller.process_frame_at(snapshot, elapsed),
            None => controller.process_frame(snapshot),
        };

        if outcome.processed {
            let elapsed_secs = controller
                .timeline()
                .last()
                .map_or(0, |sample| sample.elapsed_secs);
            let record = FrameRecord {
                id: None,
                session_id: session_id.clone(),
                timestamp: Utc::now(),
                elapsed_secs,
                squats: outcome.squat_count,
                curls: outcome.curl_count,
                calories: outcome.calories,
            };
            // Counts stay authoritative in memory even if the row is lost.
            if let Err(err) = self.db.insert_frame_record(&record).await {
                log_error!("failed to persist frame for session {}: {err:?}", session_id);
            }
        }
        drop(controller);

        let _ = self.outcome_tx.send(outcome.clone());
        Ok(outcome)
    }

    /// Zero the counters and the timeline and drop the frame log so far.
    pub async fn reset(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        let session = active.as_mut().ok_or_else(|| anyhow!("no active workout"))?;

        self.controller.lock().await.reset();
        session.counted_from = Utc::now();

        let cleared = self.db.clear_frame_records(&session.id).await?;
        log_info!(
            "Workout session {} reset; {} frame records cleared",
            session.id,
            cleared
        );

        let _ = self.outcome_tx.send(FrameOutcome::default());
        Ok(())
    }

    /// Finish the active session and build its report.
    pub async fn stop(&self) -> Result<SessionReport> {
        let mut active = self.active.lock().await;
        let session = active.take().ok_or_else(|| anyhow!("no active workout to stop"))?;

        let stopped_at = Utc::now();
        let (summary, timeline) = {
            let controller = self.controller.lock().await;
            (controller.summary(), controller.timeline().snapshot())
        };

        // Replayed streams run faster than real time; their own clock is the
        // workout length.
        let duration_secs = if session.recorded {
            summary.elapsed_secs
        } else {
            (stopped_at - session.counted_from).num_seconds().max(0) as u64
        };

        self.db
            .finish_session(
                &session.id,
                SessionStatus::Completed,
                summary.squats,
                summary.curls,
                summary.calories,
                duration_secs,
                stopped_at,
            )
            .await?;

        self.token_slot().cancel();

        info!(
            "Workout session {} completed: {} squats, {} curls, {:.2} kcal in {}s",
            session.id, summary.squats, summary.curls, summary.calories, duration_secs
        );

        Ok(SessionReport {
            session_id: session.id,
            profile: session.profile,
            summary,
            started_at: session.started_at,
            stopped_at,
            duration_secs,
            timeline,
        })
    }
}
