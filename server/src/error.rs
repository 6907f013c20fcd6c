//! Handler errors and their conversion into envelopes.
//!
//! # Design
//! Every handler returns `Result<_, ApiError>`; the single `IntoResponse` impl
//! below is the boundary that turns failures into status codes and envelopes.
//! Panics and unparseable request bodies are routed to the same `Internal`
//! variant; only missing fields answer 400.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::envelope::Envelope;

pub const MISSING_FIELDS: &str = "Faltan campos obligatorios";
pub const STUDENT_NOT_FOUND: &str = "Estudiante no encontrado";
pub const USER_NOT_FOUND: &str = "Usuario no encontrado";
pub const ROUTE_NOT_FOUND: &str = "Ruta no encontrada";
pub const INVALID_CREDENTIALS: &str = "Credenciales inválidas";
pub const INVALID_SESSION: &str = "Sesión no válida";

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or falsy.
    #[error("Faltan campos obligatorios")]
    MissingFields,

    #[error("{0}")]
    NotFound(&'static str),

    /// Missing, unknown or expired bearer token, or bad credentials.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Anything else; echoed to the client in the `error` field.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A body that is not valid JSON for the endpoint is an unhandled error, not
/// a validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Internal(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Internal(message) => {
                error!(%message, "unhandled error");
                (status, Json(Envelope::error(message))).into_response()
            }
            other => (status, Json(Envelope::failure(other.to_string()))).into_response(),
        }
    }
}
