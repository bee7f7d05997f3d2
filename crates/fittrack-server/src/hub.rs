//! 실시간 허브 — 세션 레지스트리 + WebSocket 엔드포인트.
//!
//! 활동이 영속된 직후 `broadcast`가 호출되어 접속 중인 모든 세션에
//! `ReceiveUpdate` 메시지를 밀어넣는다. 전송은 fire-and-forget:
//! 채널이 닫혔거나 가득 찬 세션은 해당 순회에서 레지스트리에서 제거된다.
//! 연결 끊긴 클라이언트를 위한 큐잉/재전송/백필은 없다.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use fittrack_core::models::event::{ActivityEvent, HubMessage};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::AppState;

/// 세션별 송신 채널 용량
const SESSION_CHANNEL_CAPACITY: usize = 64;

/// 접속 중인 세션 하나
struct SessionHandle {
    /// 이벤트 송신 채널 (bounded, fire-and-forget)
    tx: mpsc::Sender<ActivityEvent>,
    /// 연결 시 첨부된 토큰의 사용자 ID (브로드캐스트 시 미사용)
    #[allow(dead_code)]
    user_id: Option<i64>,
}

/// 세션 레지스트리
///
/// 프로세스 로컬 mutex 보호 맵. 브로드캐스트는 단일 디스패치 지점에서
/// 순차 순회하므로 세션별 전달 순서 = 방출 순서.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    /// 빈 레지스트리 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 세션 등록, 연결 ID와 수신 채널 반환
    pub fn add(&self, user_id: Option<i64>) -> (Uuid, mpsc::Receiver<ActivityEvent>) {
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        let id = Uuid::new_v4();
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(id, SessionHandle { tx, user_id });
            info!("허브 세션 등록: {} (총 {}개)", id, sessions.len());
        }
        (id, rx)
    }

    /// 세션 제거
    pub fn remove(&self, id: &Uuid) {
        if let Ok(mut sessions) = self.sessions.lock() {
            if sessions.remove(id).is_some() {
                info!("허브 세션 해제: {} (총 {}개)", id, sessions.len());
            }
        }
    }

    /// 전체 세션으로 이벤트 브로드캐스트
    ///
    /// 토큰 유무와 무관하게 모든 세션에 전달. 전송 실패(닫힘/가득 참)한
    /// 세션은 이 순회에서 바로 제거된다. 결과는 호출자에게 전파되지 않음.
    pub fn broadcast(&self, event: &ActivityEvent) {
        let Ok(mut sessions) = self.sessions.lock() else {
            warn!("세션 레지스트리 잠금 실패, 브로드캐스트 생략");
            return;
        };

        let mut dead = Vec::new();
        for (id, session) in sessions.iter() {
            if session.tx.try_send(event.clone()).is_err() {
                dead.push(*id);
            }
        }
        for id in &dead {
            sessions.remove(id);
            debug!("죽은 세션 제거: {id}");
        }

        debug!(
            "브로드캐스트: {} → {}개 세션 ({}개 제거)",
            event.summary,
            sessions.len(),
            dead.len()
        );
    }

    /// 현재 접속 세션 수
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

/// WebSocket 연결 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT (선택) — 세션에 첨부만 하고 브로드캐스트 시 강제하지 않음
    pub token: Option<String>,
}

/// WebSocket 업그레이드 핸들러
///
/// GET /ws?token=<jwt>
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    // 토큰이 있으면 검증해 사용자 ID를 세션에 첨부. 검증 실패는
    // 연결 거부 사유가 아님 (익명 세션으로 수락).
    let user_id = query
        .token
        .as_deref()
        .and_then(|t| state.jwt.verify(t).ok());

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// 세션 수명 루프
///
/// 레지스트리에 등록하고, 수신 채널의 이벤트를 `ReceiveUpdate` JSON으로
/// 직렬화해 소켓으로 내보낸다. 인바운드 텍스트 프레임은 무시(debug 로그).
async fn handle_socket(socket: WebSocket, state: AppState, user_id: Option<i64>) {
    let (id, mut rx) = state.registry.add(user_id);
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let msg = HubMessage::from(event);
                let json = match serde_json::to_string(&msg) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("허브 메시지 직렬화 실패: {e}");
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        // 클라이언트 발신 프레임은 프로토콜상 의미 없음
                        debug!("인바운드 텍스트 프레임 무시: {} bytes", text.len());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Ping/Pong은 axum이 처리
                    Some(Err(e)) => {
                        debug!("WebSocket 수신 에러: {e}");
                        break;
                    }
                }
            }
        }
    }

    state.registry.remove(&id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_core::models::activity::ActivityType;

    fn event(summary: &str) -> ActivityEvent {
        ActivityEvent {
            user_id: 1,
            activity_type: ActivityType::Meal,
            summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_all_sessions() {
        let registry = SessionRegistry::new();
        let (_id1, mut rx1) = registry.add(Some(1));
        let (_id2, mut rx2) = registry.add(None);

        registry.broadcast(&event("Chicken Salad (350 kcal)"));

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.summary, "Chicken Salad (350 kcal)");
        assert_eq!(e1, e2);
    }

    #[tokio::test]
    async fn late_connector_gets_nothing() {
        let registry = SessionRegistry::new();
        let (_id1, mut rx1) = registry.add(None);

        registry.broadcast(&event("Running (45 min)"));

        // 브로드캐스트 이후 접속한 세션은 수신 없음
        let (_id2, mut rx2) = registry.add(None);
        assert_eq!(rx1.recv().await.unwrap().summary, "Running (45 min)");
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn removed_session_not_delivered() {
        let registry = SessionRegistry::new();
        let (id, mut rx) = registry.add(None);
        registry.remove(&id);

        registry.broadcast(&event("8 hours"));
        // 채널 송신자가 drop되어 수신 불가
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dead_session_dropped_on_broadcast() {
        let registry = SessionRegistry::new();
        let (_live, _rx_live) = registry.add(None);
        let (_dead, rx_dead) = registry.add(None);
        drop(rx_dead);

        assert_eq!(registry.session_count(), 2);
        registry.broadcast(&event("Yoga (30 min)"));
        assert_eq!(registry.session_count(), 1);
    }

    #[tokio::test]
    async fn per_session_order_matches_emission_order() {
        let registry = SessionRegistry::new();
        let (_id, mut rx) = registry.add(None);

        registry.broadcast(&event("first"));
        registry.broadcast(&event("second"));
        registry.broadcast(&event("third"));

        assert_eq!(rx.recv().await.unwrap().summary, "first");
        assert_eq!(rx.recv().await.unwrap().summary, "second");
        assert_eq!(rx.recv().await.unwrap().summary, "third");
    }
}
