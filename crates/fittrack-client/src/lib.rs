//! # fittrack-client
//!
//! 대시보드 클라이언트 라이브러리.
//! REST API 클라이언트 + 실시간 허브(WebSocket) 클라이언트 +
//! 구독-후-재조회(state sync) 컴포넌트.
//!
//! 렌더링은 범위 밖 — 이 crate는 연결/구독/재조회 로직만 제공한다.

pub mod api_client;
pub mod hub_client;
pub mod sync;

pub use api_client::ApiClient;
pub use hub_client::{HubClient, HubSender};
pub use sync::{ActivityFetcher, DashboardState, DashboardSync};
