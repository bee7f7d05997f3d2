//! 활동 기록 모델 — 식사, 운동, 수면.
//!
//! `logged_at`/`sleep_start`는 항상 서버가 영속 시점에 할당한다.
//! 클라이언트 제출 순서가 아닌 커밋 순서가 사용자별 표시 순서를 결정한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 활동 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// 식사 기록
    Meal,
    /// 운동 기록
    Workout,
    /// 수면 기록
    Sleep,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActivityType::Meal => "meal",
            ActivityType::Workout => "workout",
            ActivityType::Sleep => "sleep",
        };
        f.write_str(s)
    }
}

/// 식사 기록
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// 기록 ID
    pub id: i64,
    /// 소유 사용자 ID
    pub user_id: i64,
    /// 음식 이름
    pub name: String,
    /// 칼로리 (kcal)
    pub calories: i64,
    /// 기록 시각 (서버 할당)
    pub logged_at: DateTime<Utc>,
}

impl Meal {
    /// 허브 브로드캐스트용 표시 요약 (예: "Chicken Salad (350 kcal)")
    pub fn summary(&self) -> String {
        format!("{} ({} kcal)", self.name, self.calories)
    }
}

/// 운동 기록
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// 기록 ID
    pub id: i64,
    /// 소유 사용자 ID
    pub user_id: i64,
    /// 운동 종류 (예: "Running")
    pub kind: String,
    /// 운동 시간 (분)
    pub duration_minutes: i64,
    /// 소모 칼로리 (kcal)
    pub calories_burned: i64,
    /// 기록 시각 (서버 할당)
    pub logged_at: DateTime<Utc>,
}

impl Workout {
    /// 허브 브로드캐스트용 표시 요약 (예: "Running (45 min)")
    pub fn summary(&self) -> String {
        format!("{} ({} min)", self.kind, self.duration_minutes)
    }
}

/// 수면 기록
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sleep {
    /// 기록 ID
    pub id: i64,
    /// 소유 사용자 ID
    pub user_id: i64,
    /// 수면 시간 (시간)
    pub duration_hours: f64,
    /// 수면 시작 시각 (서버 할당)
    pub sleep_start: DateTime<Utc>,
    /// 수면 종료 시각 (시작 + duration)
    pub sleep_end: DateTime<Utc>,
}

impl Sleep {
    /// 허브 브로드캐스트용 표시 요약 (예: "8 hours")
    pub fn summary(&self) -> String {
        format!("{} hours", self.duration_hours)
    }
}

/// 주간 집계 — 리포트 메일 본문에 사용
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// 지난 7일간 운동 횟수
    pub workout_count: u64,
    /// 지난 7일간 식사 기록 수
    pub meal_count: u64,
    /// 지난 7일간 수면 기록 수
    pub sleep_count: u64,
}

/// 전체 통계 — 관리자 대시보드에 사용
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_users: u64,
    pub total_workouts: u64,
    pub total_meals: u64,
    pub total_sleep_records: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_summary_format() {
        let meal = Meal {
            id: 1,
            user_id: 1,
            name: "Chicken Salad".to_string(),
            calories: 350,
            logged_at: Utc::now(),
        };
        assert_eq!(meal.summary(), "Chicken Salad (350 kcal)");
    }

    #[test]
    fn workout_summary_format() {
        let workout = Workout {
            id: 1,
            user_id: 1,
            kind: "Running".to_string(),
            duration_minutes: 45,
            calories_burned: 400,
            logged_at: Utc::now(),
        };
        assert_eq!(workout.summary(), "Running (45 min)");
    }

    #[test]
    fn sleep_summary_format() {
        let sleep = Sleep {
            id: 1,
            user_id: 1,
            duration_hours: 8.0,
            sleep_start: Utc::now(),
            sleep_end: Utc::now(),
        };
        assert_eq!(sleep.summary(), "8 hours");
    }

    #[test]
    fn activity_type_serde() {
        assert_eq!(
            serde_json::to_string(&ActivityType::Meal).unwrap(),
            "\"meal\""
        );
        let parsed: ActivityType = serde_json::from_str("\"workout\"").unwrap();
        assert_eq!(parsed, ActivityType::Workout);
    }

    #[test]
    fn meal_json_camel_case() {
        let meal = Meal {
            id: 3,
            user_id: 9,
            name: "Toast".to_string(),
            calories: 200,
            logged_at: Utc::now(),
        };
        let json = serde_json::to_string(&meal).unwrap();
        assert!(json.contains("\"userId\":9"));
        assert!(json.contains("\"loggedAt\""));
    }
}
