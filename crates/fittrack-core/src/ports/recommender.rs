//! AI 추천 서비스 포트.
//!
//! 추천 엔진 내부는 범위 밖 — 클라이언트가 제출한 JSON 구조를 그대로
//! 전달하고(`serde_json::Value` 불투명 pass-through) 응답 본문을 그대로
//! 돌려받는다. 실패는 일반 업스트림 에러로 표면화하고 재시도하지 않는다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 추천 서비스 포트
#[async_trait]
pub trait Recommender: Send + Sync {
    /// 임의 구조의 payload를 추천 서비스로 전달하고 응답을 그대로 반환
    async fn recommend(&self, payload: &serde_json::Value)
        -> Result<serde_json::Value, CoreError>;
}
