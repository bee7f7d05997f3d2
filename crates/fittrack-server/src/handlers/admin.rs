//! 관리자 API 핸들러 — 사용자 CRUD + 통계.

use axum::extract::{Path, State};
use axum::Json;
use fittrack_core::models::activity::Analytics;
use fittrack_core::models::user::{NewUser, User};
use fittrack_core::ports::storage::{ActivityStore, AdminUserUpdate, UserStore};
use serde::Deserialize;
use tracing::info;

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::AppState;

/// 관리자 사용자 생성 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub goal: String,
}

/// 관리자 사용자 갱신 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub goal: String,
}

/// 사용자 목록
///
/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.storage.list_users().await?))
}

/// 사용자 단건 조회
///
/// GET /api/admin/user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id}")))?;
    Ok(Json(user))
}

/// 사용자 생성
///
/// POST /api/admin/user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<AdminCreateRequest>,
) -> Result<Json<User>, ApiError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("이름/이메일 필수".to_string()));
    }

    let user = state
        .storage
        .create_user(&NewUser {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash: hash_password(&req.password),
            weight: req.weight,
            height: req.height,
            goal: req.goal,
        })
        .await?;

    info!("관리자 사용자 생성: id={}", user.id);
    Ok(Json(user))
}

/// 사용자 전체 필드 갱신
///
/// PUT /api/admin/user/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AdminUpdateRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .update_user(
            id,
            &AdminUserUpdate {
                name: req.name,
                email: req.email,
                weight: req.weight,
                height: req.height,
                goal: req.goal,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id}")))?;

    Ok(Json(user))
}

/// 사용자 삭제 (활동 기록 cascade 삭제)
///
/// DELETE /api/admin/user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.storage.delete_user(id).await? {
        return Err(ApiError::NotFound(format!("User {id}")));
    }
    info!("관리자 사용자 삭제: id={id}");
    Ok(Json(MessageResponse::new("User deleted")))
}

/// 전체 통계
///
/// GET /api/admin/analytics
pub async fn analytics(State(state): State<AppState>) -> Result<Json<Analytics>, ApiError> {
    Ok(Json(state.storage.analytics().await?))
}
