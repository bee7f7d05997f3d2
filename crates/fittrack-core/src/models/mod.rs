//! 도메인 모델.
//!
//! - [`user`] — 사용자 계정
//! - [`activity`] — 식사/운동/수면 기록
//! - [`event`] — 실시간 허브 이벤트 (비영속)

pub mod activity;
pub mod event;
pub mod user;
