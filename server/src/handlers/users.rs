//! `/api/users` CRUD. Every handler requires a valid bearer token.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::auth::Authenticated;
use super::parse_id;
use crate::envelope::Envelope;
use crate::error::{ApiError, USER_NOT_FOUND};
use crate::models::{User, UserFields};
use crate::state::AppState;

type Reply = Result<Json<Envelope<User>>, ApiError>;

fn user_id(raw: &str) -> Result<u64, ApiError> {
    parse_id(raw).ok_or(ApiError::NotFound(USER_NOT_FOUND))
}

pub async fn list(
    _auth: Authenticated,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<User>>> {
    let users = state.users.read().await;
    Json(Envelope::ok(users.list().to_vec()))
}

pub async fn fetch(
    _auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Reply {
    let id = user_id(&id)?;
    let users = state.users.read().await;
    users
        .get(id)
        .cloned()
        .map(|user| Json(Envelope::ok(user)))
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))
}

pub async fn create(
    Authenticated(actor): Authenticated,
    State(state): State<AppState>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let Json(fields) = payload?;
    let draft = fields.into_draft().ok_or(ApiError::MissingFields)?;
    let user = state.users.write().await.insert(draft);
    info!(id = user.id, actor = actor.id, "user created");
    Ok((StatusCode::CREATED, Json(Envelope::ok(user))))
}

pub async fn update(
    Authenticated(actor): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> Reply {
    let id = user_id(&id)?;
    let mut users = state.users.write().await;
    if users.get(id).is_none() {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }
    let Json(patch) = payload?;
    let user = users
        .update(id, patch)
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    info!(id, actor = actor.id, "user updated");
    Ok(Json(Envelope::ok(user)))
}

/// Deleting a user also revokes every token issued to it.
pub async fn remove(
    Authenticated(actor): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Reply {
    let id = user_id(&id)?;
    let user = state
        .users
        .write()
        .await
        .remove(id)
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    state.sessions.write().await.retain(|_, owner| *owner != id);
    info!(id, actor = actor.id, "user deleted");
    Ok(Json(Envelope::ok(user)))
}
