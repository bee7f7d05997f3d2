//! 수면 기록 조회/삽입.
//!
//! 수면은 시각 간격으로 저장된다. 시간 수만 입력받는 경로는
//! 시작 시각을 영속 시점(현재), 종료 시각을 시작 + `hours`로 계산한다.

use chrono::{Duration, Utc};
use fittrack_core::error::CoreError;
use fittrack_core::models::activity::Sleep;
use rusqlite::{params, Row};
use tracing::debug;

use super::{map_sqlite_error, parse_ts, SqliteStorage};

fn row_to_sleep(row: &Row<'_>) -> rusqlite::Result<Sleep> {
    Ok(Sleep {
        id: row.get(0)?,
        user_id: row.get(1)?,
        duration_hours: row.get(2)?,
        sleep_start: parse_ts(&row.get::<_, String>(3)?),
        sleep_end: parse_ts(&row.get::<_, String>(4)?),
    })
}

const SLEEP_COLUMNS: &str = "id, user_id, duration_hours, sleep_start, sleep_end";

impl SqliteStorage {
    pub(super) fn insert_sleep(&self, user_id: i64, hours: f64) -> Result<Sleep, CoreError> {
        let conn = self.lock()?;
        let sleep_start = Utc::now();
        let sleep_end = sleep_start + Duration::seconds((hours * 3600.0) as i64);

        conn.execute(
            "INSERT INTO sleep_records (user_id, duration_hours, sleep_start, sleep_end)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                hours,
                sleep_start.to_rfc3339(),
                sleep_end.to_rfc3339()
            ],
        )
        .map_err(|e| map_sqlite_error(e, "User", user_id))?;

        let id = conn.last_insert_rowid();
        debug!("수면 기록: id={} user={} hours={}", id, user_id, hours);

        Ok(Sleep {
            id,
            user_id,
            duration_hours: hours,
            sleep_start,
            sleep_end,
        })
    }

    pub(super) fn select_sleep(&self, user_id: Option<i64>) -> Result<Vec<Sleep>, CoreError> {
        let conn = self.lock()?;

        let (sql, query_params) = match user_id {
            Some(uid) => (
                format!(
                    "SELECT {SLEEP_COLUMNS} FROM sleep_records WHERE user_id = ?1
                     ORDER BY sleep_start DESC, id DESC"
                ),
                vec![uid],
            ),
            None => (
                format!(
                    "SELECT {SLEEP_COLUMNS} FROM sleep_records ORDER BY sleep_start DESC, id DESC"
                ),
                vec![],
            ),
        };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoreError::Database(e.to_string()))?;

        let records = stmt
            .query_map(rusqlite::params_from_iter(query_params), row_to_sleep)
            .map_err(|e| CoreError::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(records)
    }
}
