//! 저장소 포트.
//!
//! 사용자 계정과 활동 기록의 영속 계약. FK 무결성(활동은 기존 사용자를
//! 참조해야 함)과 사용자 삭제 시 종속 기록의 cascade 삭제를 구현체가
//! 보장해야 한다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::models::activity::{Analytics, Meal, Sleep, WeeklySummary, Workout};
use crate::models::user::{NewUser, User};

/// 관리자 사용자 갱신 입력
#[derive(Debug, Clone)]
pub struct AdminUserUpdate {
    pub name: String,
    pub email: String,
    pub weight: f64,
    pub height: f64,
    pub goal: String,
}

/// 사용자 저장소 포트
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 생성. 이메일 중복 시 `CoreError::Conflict`.
    async fn create_user(&self, new: &NewUser) -> Result<User, CoreError>;

    /// 이메일로 조회
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// ID로 조회
    async fn get_user(&self, id: i64) -> Result<Option<User>, CoreError>;

    /// 전체 목록 (관리자)
    async fn list_users(&self) -> Result<Vec<User>, CoreError>;

    /// 본인 프로필 갱신 (이름/목표)
    async fn update_profile(&self, id: i64, name: &str, goal: &str)
        -> Result<Option<User>, CoreError>;

    /// 관리자 전체 필드 갱신
    async fn update_user(&self, id: i64, update: &AdminUserUpdate)
        -> Result<Option<User>, CoreError>;

    /// 사용자 삭제. 종속 활동 기록은 cascade 삭제. 삭제 여부 반환.
    async fn delete_user(&self, id: i64) -> Result<bool, CoreError>;
}

/// 활동 기록 저장소 포트
///
/// 모든 `log_*` 연산은 타임스탬프를 영속 시점에 서버가 할당하고,
/// 존재하지 않는 사용자를 참조하면 FK 제약으로 `CoreError::NotFound`를
/// 반환한다 (여기서 재검증하지 않는다).
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// 식사 기록 삽입, 영속된 레코드 반환
    async fn log_meal(&self, user_id: i64, name: &str, calories: i64)
        -> Result<Meal, CoreError>;

    /// 사용자의 식사 기록, 최신순
    async fn meals_for_user(&self, user_id: i64) -> Result<Vec<Meal>, CoreError>;

    /// 전체 식사 기록 (관리자)
    async fn all_meals(&self) -> Result<Vec<Meal>, CoreError>;

    /// 운동 기록 삽입
    async fn log_workout(
        &self,
        user_id: i64,
        kind: &str,
        duration_minutes: i64,
        calories_burned: i64,
    ) -> Result<Workout, CoreError>;

    /// 사용자의 운동 기록, 최신순
    async fn workouts_for_user(&self, user_id: i64) -> Result<Vec<Workout>, CoreError>;

    /// 전체 운동 기록 (관리자)
    async fn all_workouts(&self) -> Result<Vec<Workout>, CoreError>;

    /// 수면 기록 삽입 (sleep_start = 지금, sleep_end = 시작 + hours)
    async fn log_sleep(&self, user_id: i64, hours: f64) -> Result<Sleep, CoreError>;

    /// 사용자의 수면 기록, 최신순
    async fn sleep_for_user(&self, user_id: i64) -> Result<Vec<Sleep>, CoreError>;

    /// 전체 수면 기록 (관리자)
    async fn all_sleep(&self) -> Result<Vec<Sleep>, CoreError>;

    /// `since` 이후의 사용자별 활동 수 집계 (주간 리포트)
    async fn weekly_summary(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<WeeklySummary, CoreError>;

    /// 전체 통계 (관리자 대시보드)
    async fn analytics(&self) -> Result<Analytics, CoreError>;
}
