//! 인증 API 핸들러 — 회원가입 / 로그인.

use axum::extract::State;
use axum::Json;
use fittrack_core::models::user::{NewUser, UserProfile};
use fittrack_core::ports::storage::UserStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::AppState;

/// 회원가입 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
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

/// 로그인 요청
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인 응답
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer 토큰
    pub token: String,
    /// 로그인한 사용자 프로필
    pub user: UserProfile,
}

/// 회원가입
///
/// POST /api/auth/register — 이메일 중복 시 400
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("이름이 비어 있음".to_string()));
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::BadRequest("이메일 형식 오류".to_string()));
    }
    if req.password.is_empty() {
        return Err(ApiError::BadRequest("비밀번호가 비어 있음".to_string()));
    }

    let new_user = NewUser {
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        password_hash: hash_password(&req.password),
        weight: req.weight,
        height: req.height,
        goal: req.goal,
    };

    let user = state.storage.create_user(&new_user).await?;
    info!("회원가입: id={} email={}", user.id, user.email);

    Ok(Json(UserProfile::from(&user)))
}

/// 로그인
///
/// POST /api/auth/login — 자격증명 불일치 시 401 "Invalid credentials"
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .storage
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if user.password_hash != hash_password(&req.password) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.jwt.issue(user.id)?;
    info!("로그인: id={} email={}", user.id, user.email);

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_deserializes_with_defaults() {
        let json = r#"{"name":"Kim","email":"kim@example.com","password":"pw"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "Kim");
        assert_eq!(req.weight, 0.0);
        assert_eq!(req.goal, "");
    }
}
