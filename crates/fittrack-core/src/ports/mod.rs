//! 포트 인터페이스 (trait).
//!
//! 어댑터 crate가 구현하고 서버에서 `Arc<dyn T>`로 와이어링한다.
//! 모든 async trait은 `async_trait` 매크로로 object safety를 보장한다.

pub mod mailer;
pub mod recommender;
pub mod storage;
