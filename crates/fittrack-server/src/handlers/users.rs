//! 사용자 프로필 API 핸들러 (JWT 보호).

use axum::extract::State;
use axum::Json;
use fittrack_core::models::user::User;
use fittrack_core::ports::storage::UserStore;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

/// 프로필 갱신 요청
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    #[serde(default)]
    pub goal: String,
}

/// 내 프로필 조회
///
/// GET /api/user/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", auth.user_id)))?;

    Ok(Json(user))
}

/// 내 프로필 갱신 (이름/목표)
///
/// PUT /api/user — 빈 이름은 400
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("이름이 비어 있음".to_string()));
    }

    let user = state
        .storage
        .update_profile(auth.user_id, req.name.trim(), &req.goal)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", auth.user_id)))?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_goal_defaults_empty() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name":"Kim"}"#).unwrap();
        assert_eq!(req.goal, "");
    }
}
