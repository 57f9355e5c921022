//! Student route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use compass_core::pathway::University;
use compass_core::student::{
    Student, StudentDraft, StudentFilter, StudentPage, StudentUpdate, TeacherAssignment,
    TeacherRole,
};
use compass_redis::WebSocketMessage;

use crate::routes::error_response;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListStudentsQuery {
    pub grade: Option<String>,
    pub class: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct AddTeacherRequest {
    pub teacher_id: String,
    pub role: TeacherRole,
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Deserialize)]
pub struct TargetUniversityRequest {
    pub university: University,
    pub reason: String,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> Result<Json<StudentPage>, (StatusCode, String)> {
    let filter = StudentFilter {
        grade: query.grade,
        class: query.class,
        search: query.search,
        page: query.page,
        limit: query.limit,
    };
    let page = compass_core::student::list_students(&state.db, &filter)
        .await
        .map_err(error_response)?;
    Ok(Json(page))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, (StatusCode, String)> {
    let student = compass_core::student::get_student(&state.db, &id)
        .await
        .map_err(error_response)?;
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(draft): Json<StudentDraft>,
) -> Result<(StatusCode, Json<Student>), (StatusCode, String)> {
    let student = compass_core::student::create_student(&state.db, draft)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(updates): Json<StudentUpdate>,
) -> Result<Json<Student>, (StatusCode, String)> {
    let student = compass_core::student::update_student(&state.db, &id, updates)
        .await
        .map_err(error_response)?;
    Ok(Json(student))
}

pub async fn add_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddTeacherRequest>,
) -> Result<Json<Student>, (StatusCode, String)> {
    let assignment = TeacherAssignment {
        teacher_id: req.teacher_id.clone(),
        role: req.role,
        subjects: req.subjects,
        start_date: chrono::Utc::now(),
    };

    let student = compass_core::student::add_teacher(&state.db, &id, assignment)
        .await
        .map_err(error_response)?;

    state.broadcast(WebSocketMessage::StudentAssigned {
        student_id: id,
        teacher_id: req.teacher_id,
    });

    Ok(Json(student))
}

pub async fn update_target_university(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TargetUniversityRequest>,
) -> Result<Json<Student>, (StatusCode, String)> {
    let university_name = req.university.name.clone();
    let student = compass_core::student::update_target_university(
        &state.db,
        &id,
        req.university,
        req.reason,
    )
    .await
    .map_err(error_response)?;

    state.broadcast(WebSocketMessage::TargetUpdated {
        student_id: id,
        university: university_name,
    });

    Ok(Json(student))
}
