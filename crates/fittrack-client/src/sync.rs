//! 대시보드 상태 동기화 — 구독-후-재조회.
//!
//! 허브 이벤트의 payload는 표시용 요약일 뿐 상태로 적용하지 않는다.
//! 본인 userId의 이벤트가 오면 해당 활동 목록을 API에서 다시 읽어
//! 전체 교체한다. 중복 이벤트는 불필요한 재조회를 유발할 뿐 상태는
//! 수렴한다 (멱등).

use async_trait::async_trait;
use fittrack_core::error::CoreError;
use fittrack_core::models::activity::{ActivityType, Meal, Sleep, Workout};
use fittrack_core::models::event::ActivityEvent;
use std::sync::Mutex;
use tracing::debug;

/// 활동 목록 재조회 포트 — `ApiClient`가 구현
#[async_trait]
pub trait ActivityFetcher: Send + Sync {
    /// 사용자의 식사 목록 (최신순)
    async fn fetch_meals(&self, user_id: i64) -> Result<Vec<Meal>, CoreError>;
    /// 사용자의 운동 목록 (최신순)
    async fn fetch_workouts(&self, user_id: i64) -> Result<Vec<Workout>, CoreError>;
    /// 사용자의 수면 목록 (최신순)
    async fn fetch_sleep(&self, user_id: i64) -> Result<Vec<Sleep>, CoreError>;
}

#[async_trait]
impl ActivityFetcher for crate::ApiClient {
    async fn fetch_meals(&self, user_id: i64) -> Result<Vec<Meal>, CoreError> {
        self.meals(user_id).await
    }

    async fn fetch_workouts(&self, user_id: i64) -> Result<Vec<Workout>, CoreError> {
        self.workouts(user_id).await
    }

    async fn fetch_sleep(&self, user_id: i64) -> Result<Vec<Sleep>, CoreError> {
        self.sleep(user_id).await
    }
}

/// 대시보드 로컬 상태 — 항상 서버 재조회 결과의 전체 교체본
#[derive(Debug, Default, Clone)]
pub struct DashboardState {
    pub meals: Vec<Meal>,
    pub workouts: Vec<Workout>,
    pub sleep: Vec<Sleep>,
}

/// 상태 동기화 컴포넌트
///
/// 허브 수신 채널과 연결해 쓰고, 뷰 해제 시 drop하면 된다 —
/// 허브 연결 자체는 이 컴포넌트보다 오래 살 수 있다.
pub struct DashboardSync<F: ActivityFetcher> {
    /// 로그인한 사용자 ID — 이 ID의 이벤트만 재조회를 유발
    user_id: i64,
    fetcher: F,
    state: Mutex<DashboardState>,
}

impl<F: ActivityFetcher> DashboardSync<F> {
    /// 새 동기화 컴포넌트 생성
    pub fn new(user_id: i64, fetcher: F) -> Self {
        Self {
            user_id,
            fetcher,
            state: Mutex::new(DashboardState::default()),
        }
    }

    /// 현재 상태 스냅샷
    pub fn state(&self) -> DashboardState {
        self.state.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// 초기 로드 — 세 목록 모두 재조회
    pub async fn refresh_all(&self) -> Result<(), CoreError> {
        let meals = self.fetcher.fetch_meals(self.user_id).await?;
        let workouts = self.fetcher.fetch_workouts(self.user_id).await?;
        let sleep = self.fetcher.fetch_sleep(self.user_id).await?;

        if let Ok(mut state) = self.state.lock() {
            state.meals = meals;
            state.workouts = workouts;
            state.sleep = sleep;
        }
        Ok(())
    }

    /// 허브 이벤트 처리
    ///
    /// 본인 이벤트면 해당 활동 목록만 재조회해 전체 교체. 타인 이벤트는
    /// 무시. 이벤트 본문은 상태에 반영하지 않는다.
    pub async fn handle_event(&self, event: &ActivityEvent) -> Result<(), CoreError> {
        if event.user_id != self.user_id {
            debug!("타 사용자 이벤트 무시: user={}", event.user_id);
            return Ok(());
        }

        match event.activity_type {
            ActivityType::Meal => {
                let meals = self.fetcher.fetch_meals(self.user_id).await?;
                if let Ok(mut state) = self.state.lock() {
                    state.meals = meals;
                }
            }
            ActivityType::Workout => {
                let workouts = self.fetcher.fetch_workouts(self.user_id).await?;
                if let Ok(mut state) = self.state.lock() {
                    state.workouts = workouts;
                }
            }
            ActivityType::Sleep => {
                let sleep = self.fetcher.fetch_sleep(self.user_id).await?;
                if let Ok(mut state) = self.state.lock() {
                    state.sleep = sleep;
                }
            }
        }
        Ok(())
    }
}
