//! HTTP REST API 클라이언트.
//!
//! 로그인 시 토큰을 보관하고 보호 엔드포인트에 Bearer 헤더를 주입한다.

use fittrack_core::error::CoreError;
use fittrack_core::models::activity::{Meal, Sleep, Workout};
use fittrack_core::models::user::{User, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};

/// 기본 요청 타임아웃 (초)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 로그인 응답
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Bearer 토큰
    pub token: String,
    /// 로그인한 사용자
    pub user: UserProfile,
}

/// 활동 기록 요청 본문
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogMealBody<'a> {
    user_id: i64,
    name: &'a str,
    calories: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogWorkoutBody<'a> {
    user_id: i64,
    #[serde(rename = "type")]
    kind: &'a str,
    duration_minutes: i64,
    calories_burned: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogSleepBody {
    user_id: i64,
    hours: f64,
}

/// REST API 클라이언트
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// 새 API 클라이언트 생성
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// 보관 중인 토큰 반환
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// 요청 빌더 생성 — 토큰이 있으면 Bearer 헤더 주입
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, &url);
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// 응답 상태 확인 및 에러 매핑
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        match status.as_u16() {
            400 => Err(CoreError::Validation {
                field: "request".to_string(),
                message: text,
            }),
            401 => Err(CoreError::Auth(text)),
            404 => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: text,
            }),
            _ => Err(CoreError::Network(format!("API 에러 ({status}): {text}"))),
        }
    }

    /// 로그인 — 성공 시 토큰을 보관하고 사용자 프로필 반환
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, CoreError> {
        let resp = self
            .request(reqwest::Method::POST, "/api/auth/login")
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("로그인 요청 실패: {e}")))?;

        let body: LoginResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Network(format!("로그인 응답 파싱 실패: {e}")))?;

        if let Ok(mut token) = self.token.write() {
            *token = Some(body.token);
        }
        info!("로그인 성공: {}", body.user.email);
        Ok(body.user)
    }

    /// 내 프로필 조회 (로그인 필요)
    pub async fn me(&self) -> Result<User, CoreError> {
        let resp = self
            .request(reqwest::Method::GET, "/api/user/me")
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("프로필 요청 실패: {e}")))?;

        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Network(format!("프로필 응답 파싱 실패: {e}")))
    }

    /// 식사 기록
    pub async fn log_meal(&self, user_id: i64, name: &str, calories: i64) -> Result<(), CoreError> {
        let resp = self
            .request(reqwest::Method::POST, "/api/meal/log")
            .json(&LogMealBody {
                user_id,
                name,
                calories,
            })
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("식사 기록 요청 실패: {e}")))?;
        Self::check(resp).await?;
        debug!("식사 기록 완료: {name}");
        Ok(())
    }

    /// 운동 기록
    pub async fn log_workout(
        &self,
        user_id: i64,
        kind: &str,
        duration_minutes: i64,
        calories_burned: i64,
    ) -> Result<(), CoreError> {
        let resp = self
            .request(reqwest::Method::POST, "/api/workout/log")
            .json(&LogWorkoutBody {
                user_id,
                kind,
                duration_minutes,
                calories_burned,
            })
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("운동 기록 요청 실패: {e}")))?;
        Self::check(resp).await?;
        Ok(())
    }

    /// 수면 기록
    pub async fn log_sleep(&self, user_id: i64, hours: f64) -> Result<(), CoreError> {
        let resp = self
            .request(reqwest::Method::POST, "/api/sleep/log")
            .json(&LogSleepBody { user_id, hours })
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("수면 기록 요청 실패: {e}")))?;
        Self::check(resp).await?;
        Ok(())
    }

    /// 사용자별 식사 목록 (최신순)
    pub async fn meals(&self, user_id: i64) -> Result<Vec<Meal>, CoreError> {
        self.fetch_list(&format!("/api/meal/{user_id}")).await
    }

    /// 사용자별 운동 목록 (최신순)
    pub async fn workouts(&self, user_id: i64) -> Result<Vec<Workout>, CoreError> {
        self.fetch_list(&format!("/api/workout/{user_id}")).await
    }

    /// 사용자별 수면 목록 (최신순)
    pub async fn sleep(&self, user_id: i64) -> Result<Vec<Sleep>, CoreError> {
        self.fetch_list(&format!("/api/sleep/{user_id}")).await
    }

    /// AI 추천 요청 — payload/응답 모두 불투명 JSON
    pub async fn recommend(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        let resp = self
            .request(reqwest::Method::POST, "/api/ai/recommend")
            .json(payload)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("추천 요청 실패: {e}")))?;
        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Network(format!("추천 응답 파싱 실패: {e}")))
    }

    async fn fetch_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, CoreError> {
        let resp = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("목록 요청 실패: {e}")))?;
        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Network(format!("목록 파싱 실패: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_stores_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"token":"jwt-abc","user":{"id":1,"name":"Kim","email":"kim@example.com","goal":""}}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        assert!(client.token().is_none());

        let user = client.login("kim@example.com", "pw").await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(client.token().as_deref(), Some("jwt-abc"));
    }

    #[tokio::test]
    async fn login_failure_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"error":"Invalid credentials","status":401}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let result = client.login("kim@example.com", "wrong").await;
        assert!(matches!(result, Err(CoreError::Auth(_))));
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn meals_fetch_and_parse() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/meal/7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":2,"userId":7,"name":"Lunch","calories":600,"loggedAt":"2026-08-30T12:00:00Z"},
                    {"id":1,"userId":7,"name":"Breakfast","calories":300,"loggedAt":"2026-08-30T08:00:00Z"}]"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let meals = client.meals(7).await.unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].name, "Lunch");
        assert_eq!(meals[0].summary(), "Lunch (600 kcal)");
    }

    #[tokio::test]
    async fn bearer_header_injected_after_login() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"token":"jwt-xyz","user":{"id":1,"name":"Kim","email":"k@e.com","goal":""}}"#,
            )
            .create_async()
            .await;
        let me_mock = server
            .mock("GET", "/api/user/me")
            .match_header("authorization", "Bearer jwt-xyz")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":1,"name":"Kim","email":"k@e.com","weight":70.0,"height":175.0,"goal":"","createdAt":"2026-08-01T00:00:00Z"}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        client.login("k@e.com", "pw").await.unwrap();
        let user = client.me().await.unwrap();
        assert_eq!(user.name, "Kim");
        me_mock.assert_async().await;
    }

    #[tokio::test]
    async fn log_meal_posts_camel_case_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/meal/log")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "userId": 3, "name": "Chicken Salad", "calories": 350
            })))
            .with_status(200)
            .with_body(r#"{"message":"Meal logged"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        client.log_meal(3, "Chicken Salad", 350).await.unwrap();
        mock.assert_async().await;
    }
}
