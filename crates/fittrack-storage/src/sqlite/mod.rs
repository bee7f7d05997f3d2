//! SQLite 저장소 어댑터.
//!
//! `UserStore` + `ActivityStore` 포트 구현.
//!
//! # 모듈 구조
//! - `users`: 사용자 계정 (UserStore 포트)
//! - `meals` / `workouts` / `sleep`: 활동 기록 (ActivityStore 포트)
//!
//! 참조 무결성은 SQLite FK 제약으로 강제한다 — 활동 삽입은 여기서 사용자
//! 존재를 재검증하지 않으며, FK 위반이 그대로 `CoreError::NotFound`로
//! 매핑된다. 사용자 삭제는 종속 기록을 cascade 삭제한다.

mod meals;
mod sleep;
mod users;
mod workouts;

use fittrack_core::error::CoreError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::migration;

/// SQLite 저장소 — `UserStore` + `ActivityStore` 포트 구현
pub struct SqliteStorage {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::Database(format!("SQLite 열기 실패: {e}")))?;

        // 성능 PRAGMA + FK 강제 (FK는 연결 단위 설정)
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            ",
        )
        .map_err(|e| CoreError::Database(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Database(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Database(format!("인메모리 SQLite 생성 실패: {e}")))?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CoreError::Database(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Database(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 연결 잠금 획득
    pub(super) fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }
}

/// 제약 위반 에러 매핑
///
/// FK 위반(존재하지 않는 사용자 참조) → NotFound,
/// UNIQUE 위반(이메일 중복) → Conflict, 나머지는 Database.
pub(super) fn map_sqlite_error(e: rusqlite::Error, resource: &str, id: i64) -> CoreError {
    const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
    const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
    const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;

    match &e {
        rusqlite::Error::SqliteFailure(err, _) => match err.extended_code {
            SQLITE_CONSTRAINT_FOREIGNKEY => CoreError::not_found(resource, id),
            SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => {
                CoreError::Conflict(format!("{resource} 고유 키 충돌"))
            }
            _ => CoreError::Database(e.to_string()),
        },
        _ => CoreError::Database(e.to_string()),
    }
}

/// RFC3339 문자열을 UTC DateTime으로 파싱 (실패 시 현재 시각)
pub(super) fn parse_ts(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now())
}

// ============================================================================
// ActivityStore 포트 구현
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fittrack_core::models::activity::{Analytics, Meal, Sleep, WeeklySummary, Workout};
use fittrack_core::ports::storage::ActivityStore;
use rusqlite::params;

#[async_trait]
impl ActivityStore for SqliteStorage {
    async fn log_meal(&self, user_id: i64, name: &str, calories: i64) -> Result<Meal, CoreError> {
        self.insert_meal(user_id, name, calories)
    }

    async fn meals_for_user(&self, user_id: i64) -> Result<Vec<Meal>, CoreError> {
        self.select_meals(Some(user_id))
    }

    async fn all_meals(&self) -> Result<Vec<Meal>, CoreError> {
        self.select_meals(None)
    }

    async fn log_workout(
        &self,
        user_id: i64,
        kind: &str,
        duration_minutes: i64,
        calories_burned: i64,
    ) -> Result<Workout, CoreError> {
        self.insert_workout(user_id, kind, duration_minutes, calories_burned)
    }

    async fn workouts_for_user(&self, user_id: i64) -> Result<Vec<Workout>, CoreError> {
        self.select_workouts(Some(user_id))
    }

    async fn all_workouts(&self) -> Result<Vec<Workout>, CoreError> {
        self.select_workouts(None)
    }

    async fn log_sleep(&self, user_id: i64, hours: f64) -> Result<Sleep, CoreError> {
        self.insert_sleep(user_id, hours)
    }

    async fn sleep_for_user(&self, user_id: i64) -> Result<Vec<Sleep>, CoreError> {
        self.select_sleep(Some(user_id))
    }

    async fn all_sleep(&self) -> Result<Vec<Sleep>, CoreError> {
        self.select_sleep(None)
    }

    async fn weekly_summary(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<WeeklySummary, CoreError> {
        let conn = self.lock()?;
        let since_str = since.to_rfc3339();

        let count = |sql: &str| -> Result<u64, CoreError> {
            conn.query_row(sql, params![user_id, since_str], |row| row.get::<_, i64>(0))
                .map(|n| n as u64)
                .map_err(|e| CoreError::Database(e.to_string()))
        };

        Ok(WeeklySummary {
            workout_count: count(
                "SELECT COUNT(*) FROM workouts WHERE user_id = ?1 AND logged_at >= ?2",
            )?,
            meal_count: count("SELECT COUNT(*) FROM meals WHERE user_id = ?1 AND logged_at >= ?2")?,
            sleep_count: count(
                "SELECT COUNT(*) FROM sleep_records WHERE user_id = ?1 AND sleep_start >= ?2",
            )?,
        })
    }

    async fn analytics(&self) -> Result<Analytics, CoreError> {
        let conn = self.lock()?;

        let count = |table: &str| -> Result<u64, CoreError> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as u64)
            .map_err(|e| CoreError::Database(e.to_string()))
        };

        Ok(Analytics {
            total_users: count("users")?,
            total_workouts: count("workouts")?,
            total_meals: count("meals")?,
            total_sleep_records: count("sleep_records")?,
        })
    }
}
