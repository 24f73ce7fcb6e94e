use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_i64, to_u32, to_u64},
    models::FrameRecord,
};

impl Database {
    pub async fn insert_frame_record(&self, record: &FrameRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO frame_records (session_id, timestamp, elapsed_secs, squats, curls, calories)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.session_id,
                    record.timestamp.to_rfc3339(),
                    to_i64(record.elapsed_secs)?,
                    record.squats,
                    record.curls,
                    record.calories,
                ],
            )
            .with_context(|| "failed to insert frame record")?;
            Ok(())
        })
        .await
    }

    pub async fn get_frame_records_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<FrameRecord>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, timestamp, elapsed_secs, squats, curls, calories
                 FROM frame_records
                 WHERE session_id = ?1
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query(params![session_id])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let timestamp: String = row.get(2)?;
                let elapsed_secs: i64 = row.get(3)?;
                let squats: i64 = row.get(4)?;
                let curls: i64 = row.get(5)?;

                records.push(FrameRecord {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    timestamp: parse_datetime(&timestamp, "timestamp")?,
                    elapsed_secs: to_u64(elapsed_secs, "elapsed_secs")?,
                    squats: to_u32(squats, "squats")?,
                    curls: to_u32(curls, "curls")?,
                    calories: row.get(6)?,
                });
            }

            Ok(records)
        })
        .await
    }

    /// Drop a session's frame log, e.g. after the counters were reset.
    pub async fn clear_frame_records(&self, session_id: &str) -> Result<usize> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM frame_records WHERE session_id = ?1",
                params![session_id],
            )
            .with_context(|| "failed to clear frame records")
        })
        .await
    }
}
