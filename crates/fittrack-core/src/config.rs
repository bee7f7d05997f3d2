//! 애플리케이션 설정 구조체.
//!
//! 서버 바인딩, 데이터베이스 경로, JWT, 업스트림 서비스(추천/메일) 설정을
//! 정의한다. `config` crate를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// AI 추천 서비스 설정
    #[serde(default)]
    pub ai: AiConfig,
    /// 메일 릴레이 설정
    #[serde(default)]
    pub mail: MailConfig,
    /// 주간 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
}

/// HTTP 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 서버 포트 (기본: 5137)
    #[serde(default = "default_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allow_external: false,
        }
    }
}

/// 데이터베이스 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite DB 파일 경로 (None이면 "fittrack.db")
    pub db_path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// 기본값이 적용된 DB 경로
    pub fn path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("fittrack.db"))
    }
}

/// 인증 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT 서명 비밀키 (운영 환경에서는 반드시 교체)
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// 토큰 유효 기간 (시간)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// AI 추천 서비스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// 추천 엔드포인트 URL
    #[serde(default = "default_recommend_url")]
    pub recommend_url: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            recommend_url: default_recommend_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

/// 메일 릴레이 설정 — 외부 발송 서비스의 HTTP 엔드포인트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// 릴레이 엔드포인트 URL
    #[serde(default = "default_mail_relay_url")]
    pub relay_url: String,
    /// 발신자 표시 이름
    #[serde(default = "default_mail_from_name")]
    pub from_name: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: default_mail_relay_url(),
            from_name: default_mail_from_name(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

/// 주간 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 주간 리포트 워커 활성화 여부
    #[serde(default = "default_true")]
    pub weekly_enabled: bool,
    /// 발송 요일 체크 주기 (분)
    #[serde(default = "default_report_check_interval_mins")]
    pub check_interval_mins: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            weekly_enabled: true,
            check_interval_mins: default_report_check_interval_mins(),
        }
    }
}

impl AppConfig {
    /// 설정 로드 — 파일(optional) → 환경변수(`FITTRACK__` prefix) 순으로 병합
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        } else {
            builder = builder.add_source(config::File::with_name("fittrack").required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FITTRACK")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))
    }

    /// 업스트림 요청 타임아웃을 Duration으로 반환
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai.timeout_secs)
    }

    /// 메일 릴레이 타임아웃을 Duration으로 반환
    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail.timeout_secs)
    }

    /// 토큰 유효 기간을 Duration으로 반환
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_hours * 3600)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    5137
}

fn default_jwt_secret() -> String {
    "dev-secret-change-in-production".to_string()
}

fn default_token_ttl_hours() -> u64 {
    24
}

fn default_recommend_url() -> String {
    "http://127.0.0.1:8000/recommend".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

fn default_mail_relay_url() -> String {
    "http://127.0.0.1:8025/send".to_string()
}

fn default_mail_from_name() -> String {
    "FitTrackAI".to_string()
}

fn default_report_check_interval_mins() -> u64 {
    60
}
