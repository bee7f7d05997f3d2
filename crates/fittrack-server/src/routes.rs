//! API 라우트 정의.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers;
use crate::hub;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 인증
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // 사용자 프로필 (JWT)
        .route("/user/me", get(handlers::users::me))
        .route("/user", put(handlers::users::update_profile))
        // 식사
        .route("/meal/log", post(handlers::activities::log_meal))
        .route("/meal/all", get(handlers::activities::all_meals))
        .route("/meal/{userId}", get(handlers::activities::meals_for_user))
        // 운동
        .route("/workout/log", post(handlers::activities::log_workout))
        .route("/workout/all", get(handlers::activities::all_workouts))
        .route(
            "/workout/{userId}",
            get(handlers::activities::workouts_for_user),
        )
        // 수면
        .route("/sleep/log", post(handlers::activities::log_sleep))
        .route("/sleep/all", get(handlers::activities::all_sleep))
        .route("/sleep/{userId}", get(handlers::activities::sleep_for_user))
        // 관리자
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/user", post(handlers::admin::create_user))
        .route("/admin/user/{id}", get(handlers::admin::get_user))
        .route("/admin/user/{id}", put(handlers::admin::update_user))
        .route("/admin/user/{id}", delete(handlers::admin::delete_user))
        .route("/admin/analytics", get(handlers::admin::analytics))
        // AI 추천 프록시
        .route("/ai/recommend", post(handlers::ai::recommend))
        // 주간 리포트 수동 발송
        .route("/report/send/{userId}", post(handlers::reports::send_report))
}

/// 전체 라우터 생성 — /api + /ws + /health
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws", get(hub::ws_handler))
        .route("/health", get(handlers::health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn routes_compile() {
        let state = test_state().await;
        let _app: Router<()> = app_routes().with_state(state);
    }
}
