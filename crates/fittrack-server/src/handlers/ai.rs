//! AI 추천 프록시 핸들러.
//!
//! 클라이언트 JSON을 구조 해석 없이 추천 서비스로 전달하고 응답 본문을
//! 그대로 돌려준다. 업스트림 실패는 고정 형태의 500 본문으로 표면화.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// 추천 요청 프록시
///
/// POST /api/ai/recommend — payload 불투명 pass-through, 재시도 없음
pub async fn recommend(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    match state.recommender.recommend(&payload).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            warn!("AI 추천 호출 실패: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "AI service call failed",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
