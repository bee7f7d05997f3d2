//! 식사 기록 조회/삽입.

use chrono::Utc;
use fittrack_core::error::CoreError;
use fittrack_core::models::activity::Meal;
use rusqlite::{params, Row};
use tracing::debug;

use super::{map_sqlite_error, parse_ts, SqliteStorage};

fn row_to_meal(row: &Row<'_>) -> rusqlite::Result<Meal> {
    Ok(Meal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        calories: row.get(3)?,
        logged_at: parse_ts(&row.get::<_, String>(4)?),
    })
}

const MEAL_COLUMNS: &str = "id, user_id, name, calories, logged_at";

impl SqliteStorage {
    pub(super) fn insert_meal(
        &self,
        user_id: i64,
        name: &str,
        calories: i64,
    ) -> Result<Meal, CoreError> {
        let conn = self.lock()?;
        let logged_at = Utc::now();

        conn.execute(
            "INSERT INTO meals (user_id, name, calories, logged_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, name, calories, logged_at.to_rfc3339()],
        )
        .map_err(|e| map_sqlite_error(e, "User", user_id))?;

        let id = conn.last_insert_rowid();
        debug!("식사 기록: id={} user={} name={}", id, user_id, name);

        Ok(Meal {
            id,
            user_id,
            name: name.to_string(),
            calories,
            logged_at,
        })
    }

    pub(super) fn select_meals(&self, user_id: Option<i64>) -> Result<Vec<Meal>, CoreError> {
        let conn = self.lock()?;

        let (sql, query_params) = match user_id {
            Some(uid) => (
                format!(
                    "SELECT {MEAL_COLUMNS} FROM meals WHERE user_id = ?1
                     ORDER BY logged_at DESC, id DESC"
                ),
                vec![uid],
            ),
            None => (
                format!("SELECT {MEAL_COLUMNS} FROM meals ORDER BY logged_at DESC, id DESC"),
                vec![],
            ),
        };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoreError::Database(e.to_string()))?;

        let meals = stmt
            .query_map(rusqlite::params_from_iter(query_params), row_to_meal)
            .map_err(|e| CoreError::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(meals)
    }
}
