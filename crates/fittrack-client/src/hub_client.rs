//! 실시간 허브 WebSocket 클라이언트.
//!
//! `tokio-tungstenite` 기반. `/ws?token=<jwt>`로 접속해 서버가 미는
//! `ReceiveUpdate` 메시지를 파싱하고 `ActivityEvent`로 전달한다.
//! 재접속은 호출자 책임 — 끊긴 동안의 이벤트는 복구되지 않는다.

use fittrack_core::error::CoreError;
use fittrack_core::models::event::{ActivityEvent, HubMessage};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 수신 채널 용량
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 허브 클라이언트
pub struct HubClient {
    base_url: String,
}

impl HubClient {
    /// 새 허브 클라이언트 생성
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 허브 연결 수립
    ///
    /// 수신 이벤트는 `rx`로, 연결 종료는 반환된 `HubSender`로 처리.
    pub async fn connect(
        &self,
        token: Option<&str>,
    ) -> Result<(HubSender, mpsc::Receiver<ActivityEvent>), CoreError> {
        let ws_url = self
            .base_url
            .replace("http://", "ws://")
            .replace("https://", "wss://");
        let url = match token {
            Some(token) => format!("{ws_url}/ws?token={token}"),
            None => format!("{ws_url}/ws"),
        };

        info!("허브 연결: {}", url.split('?').next().unwrap_or(&url));

        let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(|e| CoreError::Network(format!("허브 연결 실패: {e}")))?;

        let (write, read) = ws_stream.split();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        // 수신 태스크
        tokio::spawn(Self::read_loop(read, tx));

        Ok((HubSender { write }, rx))
    }

    /// 수신 루프 — ReceiveUpdate 프레임을 ActivityEvent로 변환
    async fn read_loop(mut read: SplitStream<WsStream>, tx: mpsc::Sender<ActivityEvent>) {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let event = match serde_json::from_str::<HubMessage>(text.as_str()) {
                        Ok(HubMessage::ReceiveUpdate {
                            user_id,
                            activity_type,
                            summary,
                        }) => ActivityEvent {
                            user_id,
                            activity_type,
                            summary,
                        },
                        Err(e) => {
                            warn!("허브 메시지 파싱 실패: {e}");
                            continue;
                        }
                    };
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("허브 연결 종료 프레임 수신");
                    break;
                }
                Ok(_) => {} // Ping/Pong은 자동 처리
                Err(e) => {
                    warn!("허브 수신 에러: {e}");
                    break;
                }
            }
        }
        debug!("허브 수신 루프 종료");
    }
}

/// 허브 송신기 — 연결 종료에 사용
pub struct HubSender {
    write: SplitSink<WsStream, Message>,
}

impl HubSender {
    /// 연결 종료
    pub async fn close(mut self) -> Result<(), CoreError> {
        self.write
            .send(Message::Close(None))
            .await
            .map_err(|e| CoreError::Network(format!("허브 종료 실패: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_core::models::activity::ActivityType;

    #[test]
    fn hub_client_normalizes_base_url() {
        let hub = HubClient::new("http://localhost:5137/");
        assert_eq!(hub.base_url, "http://localhost:5137");
    }

    #[test]
    fn receive_update_frame_parses() {
        let json = r#"{"event":"ReceiveUpdate","userId":3,"activityType":"workout","summary":"Running (45 min)"}"#;
        let msg: HubMessage = serde_json::from_str(json).unwrap();
        let HubMessage::ReceiveUpdate {
            user_id,
            activity_type,
            summary,
        } = msg;
        assert_eq!(user_id, 3);
        assert_eq!(activity_type, ActivityType::Workout);
        assert_eq!(summary, "Running (45 min)");
    }
}
