//! # fittrack-server 바이너리 진입점.
//!
//! 설정 로드 → 저장소/업스트림 어댑터 조립 → 리포트 워커 + HTTP 서버 실행.

use anyhow::{Context, Result};
use clap::Parser;
use fittrack_core::config::AppConfig;
use fittrack_server::report_worker::ReportWorker;
use fittrack_server::upstream::{HttpMailer, HttpRecommender};
use fittrack_server::HttpServer;
use fittrack_storage::SqliteStorage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// FitTrack API 서버
///
/// 개인 건강 기록 백엔드 — 활동 로그 + 실시간 대시보드 푸시
#[derive(Parser, Debug)]
#[command(name = "fittrack-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: ./fittrack.toml 탐색)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 서버 포트 (설정 파일보다 우선)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// SQLite DB 파일 경로 (설정 파일보다 우선)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 로깅 초기화 — RUST_LOG가 있으면 우선
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 설정 로드 + CLI 오버라이드
    let mut config = AppConfig::load(args.config.as_deref()).context("설정 로드 실패")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.database.db_path = Some(db_path);
    }

    // 저장소 + 업스트림 어댑터 조립
    let storage =
        Arc::new(SqliteStorage::open(&config.database.path()).context("저장소 초기화 실패")?);
    let recommender = Arc::new(
        HttpRecommender::new(&config.ai.recommend_url, config.ai_timeout())
            .context("추천 어댑터 초기화 실패")?,
    );
    let mailer = Arc::new(
        HttpMailer::new(
            &config.mail.relay_url,
            &config.mail.from_name,
            config.mail_timeout(),
        )
        .context("메일 어댑터 초기화 실패")?,
    );

    let report_config = config.report.clone();
    let server = HttpServer::new(config, storage, recommender, mailer);
    let state = server.state();

    // 종료 신호 (Ctrl+C)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C 수신, 종료 시작");
            let _ = shutdown_tx.send(true);
        }
    });

    // 주간 리포트 워커
    if report_config.weekly_enabled {
        let worker = ReportWorker::new(
            state,
            Duration::from_secs(report_config.check_interval_mins * 60),
        );
        tokio::spawn(worker.run(shutdown_rx.clone()));
    }

    server.run(shutdown_rx).await.context("서버 실행 실패")?;
    Ok(())
}
