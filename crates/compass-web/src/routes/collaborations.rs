//! Collaboration record route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use compass_core::collaboration::{CollaborationDraft, CollaborationRecord};
use compass_core::pathway::{ActionItem, ActionItemDraft};

use crate::routes::error_response;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddDecisionRequest {
    pub content: String,
    pub made_by: Vec<String>,
}

#[derive(Deserialize)]
pub struct CompleteActionItemRequest {
    pub completed_by: String,
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(draft): Json<CollaborationDraft>,
) -> Result<(StatusCode, Json<CollaborationRecord>), (StatusCode, String)> {
    let record = compass_core::collaboration::create_record(&state.db, draft)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_for_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<CollaborationRecord>>, (StatusCode, String)> {
    let records = compass_core::collaboration::list_for_student(&state.db, &student_id)
        .await
        .map_err(error_response)?;
    Ok(Json(records))
}

pub async fn add_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddDecisionRequest>,
) -> Result<Json<CollaborationRecord>, (StatusCode, String)> {
    let record =
        compass_core::collaboration::add_decision(&state.db, &id, req.content, req.made_by)
            .await
            .map_err(error_response)?;
    Ok(Json(record))
}

pub async fn add_action_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ActionItemDraft>,
) -> Result<(StatusCode, Json<ActionItem>), (StatusCode, String)> {
    let (_record, item) = compass_core::collaboration::add_action_item(&state.db, &id, draft)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn complete_action_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
    Json(req): Json<CompleteActionItemRequest>,
) -> Result<Json<CollaborationRecord>, (StatusCode, String)> {
    let record = compass_core::collaboration::complete_action_item(
        &state.db,
        &id,
        &item_id,
        &req.completed_by,
    )
    .await
    .map_err(error_response)?;
    Ok(Json(record))
}
