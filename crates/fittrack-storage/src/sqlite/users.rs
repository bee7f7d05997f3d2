//! 사용자 계정 CRUD — `UserStore` 포트 구현.

use async_trait::async_trait;
use chrono::Utc;
use fittrack_core::error::CoreError;
use fittrack_core::models::user::{NewUser, User};
use fittrack_core::ports::storage::{AdminUserUpdate, UserStore};
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{map_sqlite_error, parse_ts, SqliteStorage};

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        weight: row.get(4)?,
        height: row.get(5)?,
        goal: row.get(6)?,
        created_at: parse_ts(&row.get::<_, String>(7)?),
    })
}

const USER_COLUMNS: &str = "id, name, email, password_hash, weight, height, goal, created_at";

#[async_trait]
impl UserStore for SqliteStorage {
    async fn create_user(&self, new_user: &NewUser) -> Result<User, CoreError> {
        let conn = self.lock()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (name, email, password_hash, weight, height, goal, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new_user.name,
                new_user.email,
                new_user.password_hash,
                new_user.weight,
                new_user.height,
                new_user.goal,
                created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| map_sqlite_error(e, "User", 0))?;

        let id = conn.last_insert_rowid();
        debug!("사용자 생성: id={} email={}", id, new_user.email);

        Ok(User {
            id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            weight: new_user.weight,
            height: new_user.height,
            goal: new_user.goal.clone(),
            created_at,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            row_to_user,
        )
        .optional()
        .map_err(|e| CoreError::Database(e.to_string()))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, CoreError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            row_to_user,
        )
        .optional()
        .map_err(|e| CoreError::Database(e.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .map_err(|e| CoreError::Database(e.to_string()))?;

        let users = stmt
            .query_map([], row_to_user)
            .map_err(|e| CoreError::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| CoreError::Database(e.to_string()))?;

        Ok(users)
    }

    async fn update_profile(
        &self,
        id: i64,
        name: &str,
        goal: &str,
    ) -> Result<Option<User>, CoreError> {
        {
            let conn = self.lock()?;
            let changed = conn
                .execute(
                    "UPDATE users SET name = ?1, goal = ?2 WHERE id = ?3",
                    params![name, goal, id],
                )
                .map_err(|e| CoreError::Database(e.to_string()))?;
            if changed == 0 {
                return Ok(None);
            }
        }
        self.get_user(id).await
    }

    async fn update_user(
        &self,
        id: i64,
        update: &AdminUserUpdate,
    ) -> Result<Option<User>, CoreError> {
        {
            let conn = self.lock()?;
            let changed = conn
                .execute(
                    "UPDATE users SET name = ?1, email = ?2, weight = ?3, height = ?4, goal = ?5
                     WHERE id = ?6",
                    params![
                        update.name,
                        update.email,
                        update.weight,
                        update.height,
                        update.goal,
                        id
                    ],
                )
                .map_err(|e| map_sqlite_error(e, "User", id))?;
            if changed == 0 {
                return Ok(None);
            }
        }
        self.get_user(id).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool, CoreError> {
        let conn = self.lock()?;
        // 종속 활동 기록은 FK cascade로 함께 삭제됨
        let changed = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(|e| CoreError::Database(e.to_string()))?;
        if changed > 0 {
            debug!("사용자 삭제: id={id}");
        }
        Ok(changed > 0)
    }
}
