//! 활동 기록 API 핸들러 — 식사/운동/수면.
//!
//! 쓰기 경로는 영속 성공 직후 허브로 `ActivityEvent` 한 건을 방출한다.
//! 저장 실패 시 이벤트 없음. 브로드캐스트 결과는 응답에 영향을 주지 않는다.

use axum::extract::{Path, State};
use axum::Json;
use fittrack_core::models::activity::{ActivityType, Meal, Sleep, Workout};
use fittrack_core::models::event::ActivityEvent;
use fittrack_core::ports::storage::ActivityStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::AppState;

// ============================================================
// 요청 DTO
// ============================================================

/// 식사 기록 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMealRequest {
    pub user_id: i64,
    pub name: String,
    pub calories: i64,
}

/// 운동 기록 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkoutRequest {
    pub user_id: i64,
    /// 운동 종류 (예: "Running")
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub calories_burned: i64,
}

/// 수면 기록 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSleepRequest {
    pub user_id: i64,
    pub hours: f64,
}

// ============================================================
// 식사
// ============================================================

/// 식사 기록
///
/// POST /api/meal/log
pub async fn log_meal(
    State(state): State<AppState>,
    Json(req): Json<LogMealRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("식사 이름이 비어 있음".to_string()));
    }
    if req.calories < 0 {
        return Err(ApiError::BadRequest("칼로리는 음수 불가".to_string()));
    }

    let meal = state
        .storage
        .log_meal(req.user_id, req.name.trim(), req.calories)
        .await?;

    state.registry.broadcast(&ActivityEvent {
        user_id: meal.user_id,
        activity_type: ActivityType::Meal,
        summary: meal.summary(),
    });

    Ok(Json(MessageResponse::new("Meal logged")))
}

/// 사용자별 식사 목록 (최신순)
///
/// GET /api/meal/{userId}
pub async fn meals_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Meal>>, ApiError> {
    Ok(Json(state.storage.meals_for_user(user_id).await?))
}

/// 전체 식사 목록
///
/// GET /api/meal/all
pub async fn all_meals(State(state): State<AppState>) -> Result<Json<Vec<Meal>>, ApiError> {
    Ok(Json(state.storage.all_meals().await?))
}

// ============================================================
// 운동
// ============================================================

/// 운동 기록
///
/// POST /api/workout/log
pub async fn log_workout(
    State(state): State<AppState>,
    Json(req): Json<LogWorkoutRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.kind.trim().is_empty() {
        return Err(ApiError::BadRequest("운동 종류가 비어 있음".to_string()));
    }
    if req.duration_minutes <= 0 {
        return Err(ApiError::BadRequest("운동 시간은 양수여야 함".to_string()));
    }

    let workout = state
        .storage
        .log_workout(
            req.user_id,
            req.kind.trim(),
            req.duration_minutes,
            req.calories_burned,
        )
        .await?;

    state.registry.broadcast(&ActivityEvent {
        user_id: workout.user_id,
        activity_type: ActivityType::Workout,
        summary: workout.summary(),
    });

    Ok(Json(MessageResponse::new("Workout logged")))
}

/// 사용자별 운동 목록 (최신순)
///
/// GET /api/workout/{userId}
pub async fn workouts_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Workout>>, ApiError> {
    Ok(Json(state.storage.workouts_for_user(user_id).await?))
}

/// 전체 운동 목록
///
/// GET /api/workout/all
pub async fn all_workouts(State(state): State<AppState>) -> Result<Json<Vec<Workout>>, ApiError> {
    Ok(Json(state.storage.all_workouts().await?))
}

// ============================================================
// 수면
// ============================================================

/// 수면 기록
///
/// POST /api/sleep/log
pub async fn log_sleep(
    State(state): State<AppState>,
    Json(req): Json<LogSleepRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.hours <= 0.0 || req.hours > 24.0 {
        return Err(ApiError::BadRequest(
            "수면 시간은 0~24시간 범위여야 함".to_string(),
        ));
    }

    let sleep = state.storage.log_sleep(req.user_id, req.hours).await?;

    state.registry.broadcast(&ActivityEvent {
        user_id: sleep.user_id,
        activity_type: ActivityType::Sleep,
        summary: sleep.summary(),
    });

    Ok(Json(MessageResponse::new("Sleep logged")))
}

/// 사용자별 수면 목록 (최신순)
///
/// GET /api/sleep/{userId}
pub async fn sleep_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Sleep>>, ApiError> {
    Ok(Json(state.storage.sleep_for_user(user_id).await?))
}

/// 전체 수면 목록
///
/// GET /api/sleep/all
pub async fn all_sleep(State(state): State<AppState>) -> Result<Json<Vec<Sleep>>, ApiError> {
    Ok(Json(state.storage.all_sleep().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workout_request_maps_type_field() {
        let json = r#"{"userId":1,"type":"Running","durationMinutes":45}"#;
        let req: LogWorkoutRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, "Running");
        assert_eq!(req.duration_minutes, 45);
        assert_eq!(req.calories_burned, 0);
    }

    #[test]
    fn meal_request_camel_case() {
        let json = r#"{"userId":3,"name":"Chicken Salad","calories":350}"#;
        let req: LogMealRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_id, 3);
        assert_eq!(req.calories, 350);
    }
}
