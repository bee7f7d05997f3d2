//! 운동 기록 조회/삽입.

use chrono::Utc;
use fittrack_core::error::CoreError;
use fittrack_core::models::activity::Workout;
use rusqlite::{params, Row};
use tracing::debug;

use super::{map_sqlite_error, parse_ts, SqliteStorage};

fn row_to_workout(row: &Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        duration_minutes: row.get(3)?,
        calories_burned: row.get(4)?,
        logged_at: parse_ts(&row.get::<_, String>(5)?),
    })
}

const WORKOUT_COLUMNS: &str = "id, user_id, kind, duration_minutes, calories_burned, logged_at";

impl SqliteStorage {
    pub(super) fn insert_workout(
        &self,
        user_id: i64,
        kind: &str,
        duration_minutes: i64,
        calories_burned: i64,
    ) -> Result<Workout, CoreError> {
        let conn = self.lock()?;
        let logged_at = Utc::now();

        conn.execute(
            "INSERT INTO workouts (user_id, kind, duration_minutes, calories_burned, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                kind,
                duration_minutes,
                calories_burned,
                logged_at.to_rfc3339()
            ],
        )
        .map_err(|e| map_sqlite_error(e, "User", user_id))?;

        let id = conn.last_insert_rowid();
        debug!("운동 기록: id={} user={} kind={}", id, user_id, kind);

        Ok(Workout {
            id,
            user_id,
            kind: kind.to_string(),
            duration_minutes,
            calories_burned,
            logged_at,
        })
    }

    pub(super) fn select_workouts(&self, user_id: Option<i64>) -> Result<Vec<Workout>, CoreError> {
        let conn = self.lock()?;

        let (sql, query_params) = match user_id {
            Some(uid) => (
                format!(
                    "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = ?1
                     ORDER BY logged_at DESC, id DESC"
                ),
                vec![uid],
            ),
            None => (
                format!("SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY logged_at DESC, id DESC"),
                vec![],
            ),
        };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoreError::Database(e.to_string()))?;

        let workouts = stmt
            .query_map(rusqlite::params_from_iter(query_params), row_to_workout)
            .map_err(|e| CoreError::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(workouts)
    }
}
