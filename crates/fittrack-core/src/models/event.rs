//! 실시간 허브 이벤트.
//!
//! 활동이 영속된 직후 생성되어 접속 중인 모든 세션으로 전달되고 버려진다.
//! 저장/재전송/순서 보장 없음 — 이벤트 본문은 표시용 요약일 뿐이며,
//! 권위 있는 상태는 항상 이후의 재조회(read endpoint)에서 온다.

use serde::{Deserialize, Serialize};

use super::activity::ActivityType;

/// 브로드캐스트 이벤트 (비영속)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// 활동 소유 사용자 ID
    pub user_id: i64,
    /// 활동 종류
    pub activity_type: ActivityType,
    /// 표시용 요약 (예: "Running (45 min)")
    pub summary: String,
}

/// 허브 와이어 메시지
///
/// 서버 → 클라이언트로 전송되는 명명된 메시지. JSON 예:
/// `{"event":"ReceiveUpdate","userId":1,"activityType":"meal","summary":"..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum HubMessage {
    /// 활동 영속 직후 전체 세션으로 푸시되는 갱신 알림
    #[serde(rename_all = "camelCase")]
    ReceiveUpdate {
        user_id: i64,
        activity_type: ActivityType,
        summary: String,
    },
}

impl From<ActivityEvent> for HubMessage {
    fn from(event: ActivityEvent) -> Self {
        HubMessage::ReceiveUpdate {
            user_id: event.user_id,
            activity_type: event.activity_type,
            summary: event.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_update_wire_format() {
        let msg = HubMessage::from(ActivityEvent {
            user_id: 1,
            activity_type: ActivityType::Meal,
            summary: "Chicken Salad (350 kcal)".to_string(),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"event\":\"ReceiveUpdate\""));
        assert!(json.contains("\"userId\":1"));
        assert!(json.contains("\"activityType\":\"meal\""));
        assert!(json.contains("Chicken Salad (350 kcal)"));
    }

    #[test]
    fn receive_update_roundtrip() {
        let json = r#"{"event":"ReceiveUpdate","userId":5,"activityType":"sleep","summary":"8 hours"}"#;
        let msg: HubMessage = serde_json::from_str(json).unwrap();
        let HubMessage::ReceiveUpdate {
            user_id,
            activity_type,
            summary,
        } = msg;
        assert_eq!(user_id, 5);
        assert_eq!(activity_type, ActivityType::Sleep);
        assert_eq!(summary, "8 hours");
    }
}
