//! Login, session lookup and the bearer-token extractor.

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header, request::Parts},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::{ApiError, INVALID_CREDENTIALS, INVALID_SESSION};
use crate::models::{Credentials, LoginData, User};
use crate::state::AppState;

/// The user owning the request's bearer token.
///
/// Rejects with 401 when the `Authorization` header is missing, is not a
/// bearer token, or names a token that is unknown or whose user was deleted.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized(INVALID_SESSION))?;

        let user_id = state
            .sessions
            .read()
            .await
            .get(token)
            .copied()
            .ok_or(ApiError::Unauthorized(INVALID_SESSION))?;

        state
            .users
            .read()
            .await
            .get(user_id)
            .cloned()
            .map(Authenticated)
            .ok_or(ApiError::Unauthorized(INVALID_SESSION))
    }
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Envelope<LoginData>>, ApiError> {
    let Json(credentials) = payload?;
    let (username, password) = credentials.into_parts().ok_or(ApiError::MissingFields)?;

    let user = state
        .users
        .read()
        .await
        .find(|user| user.username == username && user.check_password(&password))
        .cloned();
    let Some(user) = user else {
        warn!(%username, "login rejected");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    let token = Uuid::new_v4().to_string();
    state.sessions.write().await.insert(token.clone(), user.id);
    info!(user_id = user.id, "login succeeded");
    Ok(Json(Envelope::ok(LoginData { token, user })))
}

pub async fn me(Authenticated(user): Authenticated) -> Json<Envelope<User>> {
    Json(Envelope::ok(user))
}
