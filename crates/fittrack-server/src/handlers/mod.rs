//! API 핸들러.

pub mod activities;
pub mod admin;
pub mod ai;
pub mod auth;
pub mod reports;
pub mod users;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

/// 헬스체크 응답
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 서버 상태
    pub status: &'static str,
    /// 접속 중인 허브 세션 수
    pub hub_sessions: usize,
}

/// 헬스체크
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        hub_sessions: state.registry.session_count(),
    })
}

/// 단순 메시지 응답 본문
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// 결과 메시지
    pub message: String,
}

impl MessageResponse {
    /// 고정 메시지 응답 생성
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_response_serializes() {
        let body = MessageResponse::new("Meal logged");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Meal logged"}"#);
    }
}
