use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::parse_id;
use crate::envelope::Envelope;
use crate::error::{ApiError, STUDENT_NOT_FOUND};
use crate::models::{Student, StudentFields};
use crate::state::AppState;

type Reply = Result<Json<Envelope<Student>>, ApiError>;

fn student_id(raw: &str) -> Result<u64, ApiError> {
    parse_id(raw).ok_or(ApiError::NotFound(STUDENT_NOT_FOUND))
}

pub async fn list(State(state): State<AppState>) -> Json<Envelope<Vec<Student>>> {
    let students = state.students.read().await;
    Json(Envelope::ok(students.list().to_vec()))
}

pub async fn fetch(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let id = student_id(&id)?;
    let students = state.students.read().await;
    students
        .get(id)
        .cloned()
        .map(|student| Json(Envelope::ok(student)))
        .ok_or(ApiError::NotFound(STUDENT_NOT_FOUND))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<StudentFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Student>>), ApiError> {
    let Json(fields) = payload?;
    let draft = fields.into_draft().ok_or(ApiError::MissingFields)?;
    let student = state.students.write().await.insert(draft);
    info!(id = student.id, "student created");
    Ok((StatusCode::CREATED, Json(Envelope::ok(student))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentFields>, JsonRejection>,
) -> Reply {
    let id = student_id(&id)?;
    let mut students = state.students.write().await;
    if students.get(id).is_none() {
        return Err(ApiError::NotFound(STUDENT_NOT_FOUND));
    }
    let Json(patch) = payload?;
    let student = students
        .update(id, patch)
        .ok_or(ApiError::NotFound(STUDENT_NOT_FOUND))?;
    info!(id, "student updated");
    Ok(Json(Envelope::ok(student)))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let id = student_id(&id)?;
    let student = state
        .students
        .write()
        .await
        .remove(id)
        .ok_or(ApiError::NotFound(STUDENT_NOT_FOUND))?;
    info!(id, "student deleted");
    Ok(Json(Envelope::ok(student)))
}
