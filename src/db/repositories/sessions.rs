use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime, parse_status, to_i64, to_u32, to_u64},
    models::{Session, SessionStatus},
};

const SESSION_COLUMNS: &str = "id, started_at, stopped_at, status, user_name, user_age, squats, curls, calories, duration_secs, created_at, updated_at";

fn row_to_session(row: &Row) -> Result<Session> {
    let started_at: String = row.get("started_at")?;
    let stopped_at: Option<String> = row.get("stopped_at")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let status: String = row.get("status")?;
    let user_age: Option<i64> = row.get("user_age")?;
    let squats: i64 = row.get("squats")?;
    let curls: i64 = row.get("curls")?;
    let duration_secs: i64 = row.get("duration_secs")?;

    Ok(Session {
        id: row.get("id")?,
        started_at: parse_datetime(&started_at, "started_at")?,
        stopped_at: parse_optional_datetime(stopped_at, "stopped_at")?,
        status: parse_status(&status)?,
        user_name: row.get("user_name")?,
        user_age: user_age.map(|age| to_u32(age, "user_age")).transpose()?,
        squats: to_u32(squats, "squats")?,
        curls: to_u32(curls, "curls")?,
        calories: row.get("calories")?,
        duration_secs: to_u64(duration_secs, "duration_secs")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_session(&self, session: &Session) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, started_at, stopped_at, status, user_name, user_age, squats, curls, calories, duration_secs, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.id,
                    record.started_at.to_rfc3339(),
                    record
                        .stopped_at
                        .as_ref()
                        .map(|dt| dt.to_rfc3339()),
                    record.status.as_str(),
                    record.user_name,
                    record.user_age,
                    record.squats,
                    record.curls,
                    record.calories,
                    to_i64(record.duration_secs)?,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert session")?;
            Ok(())
        })
        .await
    }

    /// Write final totals and status for a session.
    #[allow(clippy::too_many_arguments)]
    pub async fn finish_session(
        &self,
        session_id: &str,
        status: SessionStatus,
        squats: u32,
        curls: u32,
        calories: f64,
        duration_secs: u64,
        stopped_at: DateTime<Utc>,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE sessions
                 SET status = ?1,
                     squats = ?2,
                     curls = ?3,
                     calories = ?4,
                     duration_secs = ?5,
                     stopped_at = ?6,
                     updated_at = ?6
                 WHERE id = ?7",
                params![
                    status.as_str(),
                    squats,
                    curls,
                    calories,
                    to_i64(duration_secs)?,
                    stopped_at.to_rfc3339(),
                    session_id,
                ],
            )
            .with_context(|| "failed to update session totals")?;
            Ok(())
        })
        .await
    }

    pub async fn mark_session_interrupted(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE sessions
                 SET status = ?1,
                     stopped_at = COALESCE(stopped_at, ?2),
                     updated_at = ?2
                 WHERE id = ?3",
                params![
                    SessionStatus::Interrupted.as_str(),
                    at.to_rfc3339(),
                    session_id,
                ],
            )
            .with_context(|| "failed to mark session interrupted")?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![session_id])?;
            rows.next()?.map(row_to_session).transpose()
        })
        .await
    }

    pub async fn get_incomplete_session(&self) -> Result<Option<Session>> {
        self.execute(|conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE status = 'Running'
                 ORDER BY started_at DESC
                 LIMIT 1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            rows.next()?.map(row_to_session).transpose()
        })
        .await
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.execute(|conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE status IN ('Completed', 'Interrupted')
                 ORDER BY started_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_support::temp_database;
    use chrono::Duration;

    fn running_session(id: &str, started_at: DateTime<Utc>) -> Session {
        Session {
            id: id.to_string(),
            started_at,
            stopped_at: None,
            status: SessionStatus::Running,
            user_name: Some("Asha".into()),
            user_age: Some(31),
            squats: 0,
            curls: 0,
            calories: 0.0,
            duration_secs: 0,
            created_at: started_at,
            updated_at: started_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_finish_session() {
        let (db, dir) = temp_database();
        let started_at = Utc::now();
        db.insert_session(&running_session("s1", started_at)).await.unwrap();

        let stopped_at = started_at + Duration::seconds(95);
        db.finish_session("s1", SessionStatus::Completed, 2, 1, 11.81, 95, stopped_at)
            .await
            .unwrap();

        let session = db.get_session("s1").await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.squats, 2);
        assert_eq!(session.curls, 1);
        assert_eq!(session.calories, 11.81);
        assert_eq!(session.duration_secs, 95);
        assert_eq!(session.user_age, Some(31));
        assert!(session.stopped_at.is_some());

        assert_eq!(db.list_sessions().await.unwrap().len(), 1);
        assert!(db.get_session("missing").await.unwrap().is_none());

        drop(db);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_incomplete_session_recovery() {
        let (db, dir) = temp_database();
        db.insert_session(&running_session("stale", Utc::now())).await.unwrap();

        let stale = db.get_incomplete_session().await.unwrap().unwrap();
        assert_eq!(stale.id, "stale");

        db.mark_session_interrupted(&stale.id, Utc::now()).await.unwrap();
        assert!(db.get_incomplete_session().await.unwrap().is_none());

        let session = db.get_session("stale").await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Interrupted);

        drop(db);
        let _ = std::fs::remove_dir_all(dir);
    }
}
