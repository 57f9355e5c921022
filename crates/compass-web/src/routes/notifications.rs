//! Notification route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use compass_core::notification::Notification;

use crate::routes::error_response;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, (StatusCode, String)> {
    let notifications = compass_core::notification::list_for_user(&state.db, &user_id)
        .await
        .map_err(error_response)?;
    Ok(Json(notifications))
}

pub async fn unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UnreadCountResponse>, (StatusCode, String)> {
    let count = compass_core::notification::unread_count(&state.db, &user_id)
        .await
        .map_err(error_response)?;
    Ok(Json(UnreadCountResponse { count }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, (StatusCode, String)> {
    let notification = compass_core::notification::mark_read(&state.db, &id)
        .await
        .map_err(error_response)?;
    Ok(Json(notification))
}
