//! 주간 리포트 백그라운드 워커.
//!
//! 설정 주기(기본 1시간)마다 깨어나 "월요일 06:00 UTC 이후"인지 확인하고,
//! 해당 주에 아직 발송하지 않았다면 전체 사용자에게 리포트를 보낸다.
//! 개별 발송 실패는 로그만 남기고 다음 사용자로 넘어간다.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use fittrack_core::ports::storage::UserStore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::handlers::reports::send_weekly_report;
use crate::AppState;

/// 주간 리포트 워커
pub struct ReportWorker {
    state: AppState,
    check_interval: std::time::Duration,
    /// 마지막으로 발송을 완료한 날짜 (같은 주 중복 발송 방지)
    last_sent: Option<NaiveDate>,
}

impl ReportWorker {
    /// 새 워커 생성
    pub fn new(state: AppState, check_interval: std::time::Duration) -> Self {
        Self {
            state,
            check_interval,
            last_sent: None,
        }
    }

    /// 발송 시점인지 판단 — 월요일 06:00 UTC 이후, 당일 미발송
    fn is_due(now: DateTime<Utc>, last_sent: Option<NaiveDate>) -> bool {
        if now.weekday() != Weekday::Mon || now.hour() < 6 {
            return false;
        }
        last_sent != Some(now.date_naive())
    }

    /// 전체 사용자에게 리포트 발송
    async fn send_all(&self) -> usize {
        let users = match self.state.storage.list_users().await {
            Ok(users) => users,
            Err(e) => {
                warn!("리포트 대상 사용자 조회 실패: {e}");
                return 0;
            }
        };

        let mut sent = 0;
        for user in &users {
            match send_weekly_report(&self.state, user.id).await {
                Ok(()) => sent += 1,
                Err(e) => warn!("리포트 발송 실패 (user={}): {e}", user.id),
            }
        }
        sent
    }

    /// 워커 루프 실행
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            "주간 리포트 워커 시작 (체크 주기: {:?})",
            self.check_interval
        );
        let mut ticker = tokio::time::interval(self.check_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Utc::now();
                    if Self::is_due(now, self.last_sent) {
                        let sent = self.send_all().await;
                        info!("주간 리포트 발송 완료: {sent}건");
                        self.last_sent = Some(now.date_naive());
                    } else {
                        debug!("리포트 발송 시점 아님: {now}");
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("주간 리포트 워커 종료");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn due_on_monday_morning() {
        // 2026-08-31은 월요일
        let now = Utc.with_ymd_and_hms(2026, 8, 31, 6, 0, 0).unwrap();
        assert!(ReportWorker::is_due(now, None));
    }

    #[test]
    fn not_due_before_six() {
        let now = Utc.with_ymd_and_hms(2026, 8, 31, 5, 59, 0).unwrap();
        assert!(!ReportWorker::is_due(now, None));
    }

    #[test]
    fn not_due_on_other_days() {
        // 2026-09-01은 화요일
        let now = Utc.with_ymd_and_hms(2026, 9, 1, 6, 0, 0).unwrap();
        assert!(!ReportWorker::is_due(now, None));
    }

    #[test]
    fn not_due_twice_same_day() {
        let now = Utc.with_ymd_and_hms(2026, 8, 31, 7, 0, 0).unwrap();
        assert!(!ReportWorker::is_due(now, Some(now.date_naive())));
        // 다음 주 월요일은 다시 발송
        let next = Utc.with_ymd_and_hms(2026, 9, 7, 6, 0, 0).unwrap();
        assert!(ReportWorker::is_due(next, Some(now.date_naive())));
    }
}
