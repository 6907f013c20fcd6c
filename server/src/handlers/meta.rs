//! Stateless service endpoints: banner, health probe, project info, the
//! error-boundary probe and the 404 fallback.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::{ApiError, ROUTE_NOT_FOUND};
use crate::state::AppState;

pub const BANNER_MESSAGE: &str = "¡Aplicación CI/CD en AWS funcionando correctamente!";

/// Current UTC time as ISO-8601 with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub version: &'static str,
    pub environment: String,
    pub timestamp: String,
    pub hostname: String,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    /// Seconds since the application state was created.
    pub uptime: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectInfo {
    pub project: &'static str,
    pub technology: &'static str,
    pub cloud: &'static str,
    pub cicd: &'static str,
    pub infrastructure: &'static str,
}

pub async fn banner(State(state): State<AppState>) -> Json<Envelope<Banner>> {
    Json(
        Envelope::ok(Banner {
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.clone(),
            timestamp: now_iso(),
            hostname: state.config.hostname(),
        })
        .with_message(BANNER_MESSAGE),
    )
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "OK",
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: now_iso(),
    })
}

pub async fn info() -> Json<ProjectInfo> {
    Json(ProjectInfo {
        project: "Proyecto Final CI/CD",
        technology: "Rust + Axum",
        cloud: "AWS ECS Fargate",
        cicd: "GitHub Actions",
        infrastructure: "Terraform",
    })
}

/// Always panics; checks that the panic boundary answers with a 500 envelope.
pub async fn fail() -> StatusCode {
    panic!("Error de prueba")
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound(ROUTE_NOT_FOUND)
}
