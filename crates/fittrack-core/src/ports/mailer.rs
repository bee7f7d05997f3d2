//! 메일 발송 포트.
//!
//! 외부 메일 릴레이를 불투명한 협력자로 취급한다 — (수신자, 제목, HTML 본문)을
//! 전달하고 성공/실패만 받는다. 실패는 호출자에게 그대로 전파하며 재시도하지
//! 않는다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 메일 발송 포트
#[async_trait]
pub trait Mailer: Send + Sync {
    /// HTML 메일 한 통 발송
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), CoreError>;
}
