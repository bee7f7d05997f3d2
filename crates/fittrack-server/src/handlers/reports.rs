//! 주간 리포트 핸들러 — 집계 + HTML 렌더 + 메일 발송.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use fittrack_core::error::CoreError;
use fittrack_core::models::activity::WeeklySummary;
use fittrack_core::models::user::User;
use fittrack_core::ports::storage::{ActivityStore, UserStore};
use tracing::info;

use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::AppState;

/// 주간 리포트 HTML 렌더
pub fn render_report_html(user: &User, summary: &WeeklySummary) -> String {
    format!(
        "<html><body>\
         <h1>Weekly Health Report</h1>\
         <p>Hi {name}, here is your activity for the last 7 days:</p>\
         <ul>\
         <li>Workouts: {workouts}</li>\
         <li>Meals logged: {meals}</li>\
         <li>Sleep records: {sleeps}</li>\
         </ul>\
         <p>Goal: {goal}</p>\
         <p>Keep it up!<br/>— FitTrackAI</p>\
         </body></html>",
        name = user.name,
        workouts = summary.workout_count,
        meals = summary.meal_count,
        sleeps = summary.sleep_count,
        goal = if user.goal.is_empty() {
            "not set"
        } else {
            &user.goal
        },
    )
}

/// 사용자 한 명에게 주간 리포트 발송
///
/// 최근 7일 집계 → HTML 렌더 → 메일 릴레이. 실패는 전파, 재시도 없음.
pub async fn send_weekly_report(state: &AppState, user_id: i64) -> Result<(), CoreError> {
    let user = state
        .storage
        .get_user(user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;

    let since = Utc::now() - Duration::days(7);
    let summary = state.storage.weekly_summary(user.id, since).await?;
    let html = render_report_html(&user, &summary);

    state
        .mailer
        .send(&user.email, "Your FitTrack Weekly Report", &html)
        .await?;

    info!("주간 리포트 발송: user={} email={}", user.id, user.email);
    Ok(())
}

/// 주간 리포트 수동 발송
///
/// POST /api/report/send/{userId}
pub async fn send_report(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    send_weekly_report(&state, user_id).await?;
    Ok(Json(MessageResponse::new("Report sent")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_html_contains_counts() {
        let user = User {
            id: 1,
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            password_hash: String::new(),
            weight: 70.0,
            height: 175.0,
            goal: "run a marathon".to_string(),
            created_at: Utc::now(),
        };
        let summary = WeeklySummary {
            workout_count: 3,
            meal_count: 14,
            sleep_count: 7,
        };

        let html = render_report_html(&user, &summary);
        assert!(html.contains("Kim"));
        assert!(html.contains("Workouts: 3"));
        assert!(html.contains("Meals logged: 14"));
        assert!(html.contains("Sleep records: 7"));
        assert!(html.contains("run a marathon"));
    }

    #[test]
    fn report_html_handles_empty_goal() {
        let user = User {
            id: 1,
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password_hash: String::new(),
            weight: 0.0,
            height: 0.0,
            goal: String::new(),
            created_at: Utc::now(),
        };
        let summary = WeeklySummary {
            workout_count: 0,
            meal_count: 0,
            sleep_count: 0,
        };
        assert!(render_report_html(&user, &summary).contains("not set"));
    }
}
