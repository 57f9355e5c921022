//! Compass Web Server
//!
//! Axum-based REST API for the admission portal, with WebSocket fan-out of
//! mutation events. Routes live under `/api/v1`.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use compass_redis::RedisPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Students
        .route("/students", get(routes::students::list_students))
        .route("/students", post(routes::students::create_student))
        .route("/students/{id}", get(routes::students::get_student))
        .route("/students/{id}", put(routes::students::update_student))
        .route("/students/{id}/teachers", post(routes::students::add_teacher))
        .route(
            "/students/{id}/target-university",
            put(routes::students::update_target_university),
        )
        // Pathways
        .route("/pathways", post(routes::pathways::create_pathway))
        .route("/pathways/{id}", get(routes::pathways::get_pathway))
        .route(
            "/pathways/student/{student_id}",
            get(routes::pathways::get_student_pathway),
        )
        .route(
            "/pathways/{id}/milestones",
            post(routes::pathways::add_milestone),
        )
        .route(
            "/pathways/{id}/milestones/{milestone_id}",
            put(routes::pathways::update_milestone),
        )
        .route(
            "/pathways/{id}/milestones/{milestone_id}/progress",
            patch(routes::pathways::update_progress),
        )
        .route(
            "/pathways/{id}/milestones/{milestone_id}/action-items",
            post(routes::pathways::add_action_item),
        )
        .route(
            "/pathways/{id}/adjustments",
            post(routes::pathways::add_adjustment),
        )
        .route("/pathways/{id}/status", patch(routes::pathways::set_status))
        // Collaborations
        .route(
            "/collaborations",
            post(routes::collaborations::create_record),
        )
        .route(
            "/collaborations/student/{student_id}",
            get(routes::collaborations::list_for_student),
        )
        .route(
            "/collaborations/{id}/decisions",
            post(routes::collaborations::add_decision),
        )
        .route(
            "/collaborations/{id}/action-items",
            post(routes::collaborations::add_action_item),
        )
        .route(
            "/collaborations/{id}/action-items/{item_id}/complete",
            patch(routes::collaborations::complete_action_item),
        )
        // Notifications
        .route(
            "/notifications/{user_id}",
            get(routes::notifications::list_for_user),
        )
        .route(
            "/notifications/{user_id}/unread-count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            patch(routes::notifications::mark_read),
        )
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(db: Arc<RedisPool>, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(db);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
