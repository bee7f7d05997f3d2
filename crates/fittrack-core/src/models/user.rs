//! 사용자 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 사용자 계정
///
/// `password_hash`는 직렬화에서 제외한다 — API 응답에 절대 노출하지 않는다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 사용자 ID
    pub id: i64,
    /// 이름
    pub name: String,
    /// 이메일 (고유)
    pub email: String,
    /// 비밀번호 해시 (SHA-256, base64)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// 체중 (kg)
    pub weight: f64,
    /// 신장 (cm)
    pub height: f64,
    /// 건강 목표 (자유 텍스트)
    pub goal: String,
    /// 가입 시각
    pub created_at: DateTime<Utc>,
}

/// 신규 사용자 생성 입력
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub weight: f64,
    pub height: f64,
    pub goal: String,
}

/// 공개 프로필 뷰 — 로그인 응답과 프로필 조회에 사용
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub goal: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            goal: user.goal.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_not_serialized() {
        let user = User {
            id: 1,
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            password_hash: "secret".to_string(),
            weight: 70.0,
            height: 175.0,
            goal: "run a marathon".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("kim@example.com"));
    }

    #[test]
    fn profile_from_user() {
        let user = User {
            id: 7,
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password_hash: String::new(),
            weight: 0.0,
            height: 0.0,
            goal: String::new(),
            created_at: Utc::now(),
        };
        let profile = UserProfile::from(&user);
        assert_eq!(profile.id, 7);
        assert_eq!(profile.name, "Lee");
    }
}
