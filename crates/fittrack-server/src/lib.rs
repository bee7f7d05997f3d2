//! # fittrack-server
//!
//! FitTrack HTTP API 서버.
//! Axum 기반 REST API + WebSocket 실시간 허브.
//!
//! ## 기능
//! - 활동 기록 API (식사/운동/수면)
//! - 실시간 브로드캐스트 허브 (ReceiveUpdate 푸시)
//! - 인증 (JWT) + 사용자 프로필
//! - 관리자 CRUD + 통계
//! - AI 추천 프록시
//! - 주간 리포트 (수동 발송 + 백그라운드 워커)

pub mod auth;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod report_worker;
pub mod routes;
pub mod upstream;

use axum::Router;
use fittrack_core::config::AppConfig;
use fittrack_core::ports::mailer::Mailer;
use fittrack_core::ports::recommender::Recommender;
use fittrack_storage::SqliteStorage;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::JwtService;
use crate::hub::SessionRegistry;

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// SQLite 저장소
    pub storage: Arc<SqliteStorage>,
    /// 허브 세션 레지스트리
    pub registry: Arc<SessionRegistry>,
    /// JWT 발급/검증
    pub jwt: JwtService,
    /// AI 추천 어댑터
    pub recommender: Arc<dyn Recommender>,
    /// 메일 릴레이 어댑터
    pub mailer: Arc<dyn Mailer>,
}

/// FitTrack HTTP 서버
pub struct HttpServer {
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    /// 새 서버 생성
    pub fn new(
        config: AppConfig,
        storage: Arc<SqliteStorage>,
        recommender: Arc<dyn Recommender>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let jwt = JwtService::new(&config.auth.jwt_secret, config.token_ttl());
        Self {
            config,
            state: AppState {
                storage,
                registry: Arc::new(SessionRegistry::new()),
                jwt,
                recommender,
                mailer,
            },
        }
    }

    /// 애플리케이션 상태 반환 (워커 공유용)
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// 서버 실행
    ///
    /// 기본 포트에서 시작하여, 포트가 이미 사용 중이면 다음 포트를 시도합니다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환합니다.
    ///
    /// # Arguments
    /// * `shutdown_rx` - 종료 신호 수신 채널
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.server.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        // CORS 설정
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // 라우터 구성
        let app: Router = routes::app_routes()
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state);

        // 포트 바인드 시도 (최대 MAX_PORT_ATTEMPTS번)
        let base_port = self.config.server.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);

            // 포트 오버플로우 체크
            if port < base_port && attempt > 0 {
                break;
            }

            let addr: SocketAddr = match format!("{host}:{port}").parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {}:{} — {}", host, port, e);
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    info!("API 서버 시작: http://{}", addr);

                    // Graceful shutdown과 함께 서버 실행
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("API 서버 종료");
                    return Ok(());
                }
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::AddrInUse {
                        warn!("포트 {} 이미 사용 중, 다음 포트 시도...", port);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.server.port)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use fittrack_core::error::CoreError;
    use std::sync::Mutex;
    use std::time::Duration;

    /// 호출만 기록하는 추천 스텁
    pub struct StubRecommender;

    #[async_trait]
    impl Recommender for StubRecommender {
        async fn recommend(
            &self,
            payload: &serde_json::Value,
        ) -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::json!({"echo": payload}))
        }
    }

    /// 발송 내역을 기록하는 메일 스텁
    #[derive(Default)]
    pub struct StubMailer {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for StubMailer {
        async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), CoreError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    /// 인메모리 상태 생성
    pub async fn test_state() -> AppState {
        AppState {
            storage: Arc::new(SqliteStorage::open_in_memory().unwrap()),
            registry: Arc::new(SessionRegistry::new()),
            jwt: JwtService::new("test-secret", Duration::from_secs(3600)),
            recommender: Arc::new(StubRecommender),
            mailer: Arc::new(StubMailer::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_server() -> HttpServer {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let recommender = Arc::new(
            upstream::HttpRecommender::new("http://127.0.0.1:1/recommend", Duration::from_secs(1))
                .unwrap(),
        );
        let mailer = Arc::new(
            upstream::HttpMailer::new("http://127.0.0.1:1/send", "FitTrackAI", Duration::from_secs(1))
                .unwrap(),
        );
        HttpServer::new(AppConfig::default(), storage, recommender, mailer)
    }

    #[test]
    fn server_url_uses_configured_port() {
        let server = test_server();
        assert_eq!(server.url(), "http://localhost:5137");
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn max_port_attempts_is_reasonable() {
        // 최소 1번, 최대 100번 사이
        assert!(MAX_PORT_ATTEMPTS >= 1);
        assert!(MAX_PORT_ATTEMPTS <= 100);
    }
}
