//! 업스트림 서비스 어댑터 — AI 추천 프록시 + 메일 릴레이.
//!
//! 두 협력자 모두 불투명한 외부 HTTP 서비스로 취급한다. 요청은 그대로
//! 전달, 실패는 `CoreError::Upstream`으로 표면화, 재시도 없음.

use async_trait::async_trait;
use fittrack_core::error::CoreError;
use fittrack_core::ports::mailer::Mailer;
use fittrack_core::ports::recommender::Recommender;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// AI 추천 서비스 HTTP 어댑터 — `Recommender` 포트 구현
pub struct HttpRecommender {
    client: reqwest::Client,
    recommend_url: String,
}

impl HttpRecommender {
    /// 새 추천 어댑터 생성
    pub fn new(recommend_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            recommend_url: recommend_url.to_string(),
        })
    }
}

#[async_trait]
impl Recommender for HttpRecommender {
    async fn recommend(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        debug!("추천 요청 전달: {}", self.recommend_url);

        let resp = self
            .client
            .post(&self.recommend_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("추천 서비스 연결 실패: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "추천 서비스 에러 ({status}): {text}"
            )));
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| CoreError::Upstream(format!("추천 응답 파싱 실패: {e}")))
    }
}

/// 메일 릴레이 요청 본문
#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    to: &'a str,
    from_name: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

/// 외부 메일 릴레이 HTTP 어댑터 — `Mailer` 포트 구현
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    from_name: String,
}

impl HttpMailer {
    /// 새 메일 어댑터 생성
    pub fn new(relay_url: &str, from_name: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            relay_url: relay_url.to_string(),
            from_name: from_name.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), CoreError> {
        let payload = RelayPayload {
            to,
            from_name: &self.from_name,
            subject,
            html_body,
        };

        let resp = self
            .client
            .post(&self.relay_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("메일 릴레이 연결 실패: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "메일 릴레이 에러 ({status}): {text}"
            )));
        }

        info!("메일 발송 완료: to={to} subject={subject}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn recommend_passes_payload_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/recommend")
            .match_body(mockito::Matcher::Json(json!({"goal": "lose weight"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"recommendation":"More cardio"}"#)
            .create_async()
            .await;

        let recommender = HttpRecommender::new(
            &format!("{}/recommend", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();

        let result = recommender
            .recommend(&json!({"goal": "lose weight"}))
            .await
            .unwrap();

        assert_eq!(result["recommendation"], "More cardio");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn recommend_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/recommend")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let recommender = HttpRecommender::new(
            &format!("{}/recommend", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();

        let result = recommender.recommend(&json!({})).await;
        assert!(matches!(result, Err(CoreError::Upstream(_))));
    }

    #[tokio::test]
    async fn mailer_posts_relay_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_body(mockito::Matcher::PartialJson(json!({
                "to": "user@example.com",
                "from_name": "FitTrackAI",
                "subject": "Weekly Report",
            })))
            .with_status(200)
            .create_async()
            .await;

        let mailer = HttpMailer::new(
            &format!("{}/send", server.url()),
            "FitTrackAI",
            Duration::from_secs(5),
        )
        .unwrap();

        mailer
            .send("user@example.com", "Weekly Report", "<h1>Hi</h1>")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn mailer_relay_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/send")
            .with_status(500)
            .create_async()
            .await;

        let mailer = HttpMailer::new(
            &format!("{}/send", server.url()),
            "FitTrackAI",
            Duration::from_secs(5),
        )
        .unwrap();

        let result = mailer.send("user@example.com", "x", "y").await;
        assert!(matches!(result, Err(CoreError::Upstream(_))));
    }
}
