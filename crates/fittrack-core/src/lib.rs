//! # fittrack-core
//!
//! FitTrack 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`] — 저장소/메일/추천 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::activity::ActivityType;
    use crate::models::event::ActivityEvent;

    #[test]
    fn activity_event_clone_eq() {
        let event = ActivityEvent {
            user_id: 1,
            activity_type: ActivityType::Workout,
            summary: "Running (45 min)".to_string(),
        };
        let cloned = event.clone();
        assert_eq!(event, cloned);
    }
}
