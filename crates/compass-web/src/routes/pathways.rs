//! Pathway route handlers.
//!
//! Every mutating call returns the full pathway document with the derived
//! overall progress. Bodies carry an optional `expected_version` so clients
//! can submit against the version they read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use compass_core::notification::{
    self, NotificationDraft, NotificationKind, NotificationPriority, RelatedEntity,
    RelatedEntityKind, milestone_notification,
};
use compass_core::pathway::{
    ActionItem, ActionItemDraft, ActionItemPriority, AdjustmentDraft, AdjustmentKind, Milestone,
    MilestoneDraft, MilestoneStatus, MilestoneUpdate, PathwayStatus, PathwayView, University,
};
use compass_redis::WebSocketMessage;

use crate::routes::error_response;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePathwayRequest {
    pub student_id: String,
    pub target_university: University,
    pub milestones: Vec<MilestoneDraft>,
}

#[derive(Deserialize)]
pub struct AddMilestoneRequest {
    #[serde(flatten)]
    pub milestone: MilestoneDraft,
    pub reason: Option<String>,
    pub made_by: Option<String>,
    pub expected_version: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateMilestoneRequest {
    #[serde(flatten)]
    pub updates: MilestoneUpdate,
    pub expected_version: Option<i64>,
}

#[derive(Deserialize)]
pub struct ProgressRequest {
    pub progress: i64,
    pub expected_version: Option<i64>,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub milestone: Milestone,
    pub overall_progress: i64,
    pub version: i64,
}

#[derive(Deserialize)]
pub struct AddActionItemRequest {
    #[serde(flatten)]
    pub item: ActionItemDraft,
    pub expected_version: Option<i64>,
}

#[derive(Deserialize)]
pub struct AddAdjustmentRequest {
    #[serde(flatten)]
    pub adjustment: AdjustmentDraft,
    pub expected_version: Option<i64>,
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: PathwayStatus,
    pub expected_version: Option<i64>,
}

pub async fn create_pathway(
    State(state): State<AppState>,
    Json(req): Json<CreatePathwayRequest>,
) -> Result<(StatusCode, Json<PathwayView>), (StatusCode, String)> {
    let pathway = compass_core::pathway::create_pathway(
        &state.db,
        &req.student_id,
        req.target_university,
        req.milestones,
    )
    .await
    .map_err(error_response)?;

    state.broadcast(WebSocketMessage::PathwayCreated {
        student_id: req.student_id,
        pathway_id: pathway.id.clone(),
    });

    Ok((StatusCode::CREATED, Json(pathway.into())))
}

pub async fn get_pathway(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PathwayView>, (StatusCode, String)> {
    let pathway = compass_core::pathway::get_pathway(&state.db, &id)
        .await
        .map_err(error_response)?;
    Ok(Json(pathway.into()))
}

/// The student's currently active pathway, or null.
pub async fn get_student_pathway(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Option<PathwayView>>, (StatusCode, String)> {
    let pathway = compass_core::pathway::get_active_pathway(&state.db, &student_id)
        .await
        .map_err(error_response)?;
    Ok(Json(pathway.map(PathwayView::from)))
}

pub async fn add_milestone(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddMilestoneRequest>,
) -> Result<Json<PathwayView>, (StatusCode, String)> {
    let title = req.milestone.title.clone();

    compass_core::pathway::add_milestone(&state.db, &id, req.milestone, req.expected_version)
        .await
        .map_err(error_response)?;

    // The addition itself is audited in the adjustment history.
    let pathway = compass_core::pathway::add_adjustment(
        &state.db,
        &id,
        AdjustmentDraft {
            kind: AdjustmentKind::MilestoneAdjust,
            description: format!("Added milestone: {}", title),
            reason: req.reason.unwrap_or_else(|| "Plan adjustment".to_string()),
            made_by: req.made_by.unwrap_or_else(|| "system".to_string()),
            affected_milestones: vec![],
            previous_value: None,
            new_value: None,
        },
        None,
    )
    .await
    .map_err(error_response)?;

    Ok(Json(pathway.into()))
}

pub async fn update_milestone(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(String, String)>,
    Json(req): Json<UpdateMilestoneRequest>,
) -> Result<Json<PathwayView>, (StatusCode, String)> {
    let delayed = req.updates.status == Some(MilestoneStatus::Delayed);

    let pathway = compass_core::pathway::update_milestone(
        &state.db,
        &id,
        &milestone_id,
        &req.updates,
        req.expected_version,
    )
    .await
    .map_err(error_response)?;

    if let Some(milestone) = pathway.milestone(&milestone_id) {
        state.broadcast(WebSocketMessage::MilestoneUpdated {
            pathway_id: id.clone(),
            milestone_id: milestone_id.clone(),
            status: milestone.status.as_str().to_string(),
        });

        // A delay pages every teacher attached to the student.
        if delayed {
            let student =
                compass_core::student::get_student(&state.db, &pathway.student_id)
                    .await
                    .map_err(error_response)?;
            for teacher in &student.related_teachers {
                let draft = milestone_notification(
                    &teacher.teacher_id,
                    milestone,
                    NotificationKind::MilestoneDelayed,
                );
                let created = notification::create_notification(&state.db, draft)
                    .await
                    .map_err(error_response)?;
                state.broadcast(WebSocketMessage::NotificationCreated {
                    user_id: teacher.teacher_id.clone(),
                    notification_id: created.id,
                });
            }
        }
    }

    Ok(Json(pathway.into()))
}

pub async fn update_progress(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(String, String)>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, (StatusCode, String)> {
    let pathway = compass_core::pathway::update_milestone_progress(
        &state.db,
        &id,
        &milestone_id,
        req.progress,
        req.expected_version,
    )
    .await
    .map_err(error_response)?;

    let milestone = pathway
        .milestone(&milestone_id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Milestone not found".to_string()))?;

    state.broadcast(WebSocketMessage::MilestoneProgress {
        pathway_id: id,
        milestone_id,
        progress: req.progress,
        status: milestone.status.as_str().to_string(),
    });

    Ok(Json(ProgressResponse {
        overall_progress: pathway.overall_progress(),
        version: pathway.version,
        milestone,
    }))
}

pub async fn add_action_item(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(String, String)>,
    Json(req): Json<AddActionItemRequest>,
) -> Result<(StatusCode, Json<ActionItem>), (StatusCode, String)> {
    let (_pathway, item) = compass_core::pathway::add_action_item(
        &state.db,
        &id,
        &milestone_id,
        req.item,
        req.expected_version,
    )
    .await
    .map_err(error_response)?;

    // Tell the assignee they have new work.
    let priority = if item.priority == ActionItemPriority::High {
        NotificationPriority::High
    } else {
        NotificationPriority::Normal
    };
    let created = notification::create_notification(
        &state.db,
        NotificationDraft {
            user_id: item.assigned_to.clone(),
            kind: NotificationKind::ActionAssigned,
            title: "New task assigned".to_string(),
            message: format!("You have been assigned a task: {}", item.title),
            priority,
            related_entity: Some(RelatedEntity {
                kind: RelatedEntityKind::Milestone,
                id: milestone_id.clone(),
            }),
            expires_at: None,
        },
    )
    .await
    .map_err(error_response)?;

    state.broadcast(WebSocketMessage::NotificationCreated {
        user_id: item.assigned_to.clone(),
        notification_id: created.id,
    });
    state.broadcast(WebSocketMessage::ActionItemAssigned {
        milestone_id,
        assigned_to: item.assigned_to.clone(),
        title: item.title.clone(),
    });

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn add_adjustment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddAdjustmentRequest>,
) -> Result<Json<PathwayView>, (StatusCode, String)> {
    let pathway =
        compass_core::pathway::add_adjustment(&state.db, &id, req.adjustment, req.expected_version)
            .await
            .map_err(error_response)?;
    Ok(Json(pathway.into()))
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<PathwayView>, (StatusCode, String)> {
    let pathway =
        compass_core::pathway::set_status(&state.db, &id, req.status, req.expected_version)
            .await
            .map_err(error_response)?;
    Ok(Json(pathway.into()))
}
