//! JWT 발급/검증 + 비밀번호 해시.
//!
//! HS256 서명 토큰. subject는 사용자 ID, 만료는 설정의 TTL.
//! 비밀번호는 SHA-256 해시를 base64로 인코딩해 저장한다.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fittrack_core::error::CoreError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::error::ApiError;
use crate::AppState;

/// JWT 클레임
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    pub sub: String,
    /// 만료 시각 (unix epoch 초)
    pub exp: u64,
}

/// JWT 발급/검증 서비스
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    /// 새 JWT 서비스 생성
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// 사용자 ID로 토큰 발급
    pub fn issue(&self, user_id: i64) -> Result<String, CoreError> {
        let exp = chrono::Utc::now() + chrono::Duration::from_std(self.ttl).unwrap_or_default();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp() as u64,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| CoreError::Auth(format!("토큰 발급 실패: {e}")))
    }

    /// 토큰 검증, 사용자 ID 반환
    pub fn verify(&self, token: &str) -> Result<i64, CoreError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| CoreError::Auth(format!("토큰 검증 실패: {e}")))?;
        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| CoreError::Auth("토큰 subject가 사용자 ID가 아님".to_string()))
    }
}

/// 비밀번호 해시 — SHA-256 → base64
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// 인증된 사용자 추출기
///
/// `Authorization: Bearer <jwt>` 헤더를 검증하고 사용자 ID를 꺼낸다.
/// 헤더 누락/형식 오류/검증 실패는 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// 토큰 subject의 사용자 ID
    pub user_id: i64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authorization 헤더 없음".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Bearer 토큰 형식 아님".to_string()))?;

        let user_id = state
            .jwt
            .verify(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(AuthUser { user_id })
    }
}
