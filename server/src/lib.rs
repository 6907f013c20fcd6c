//! In-memory student and user management API.
//!
//! # Overview
//! Serves CRUD endpoints for students (`/api/students`) and users
//! (`/api/users`), a token login (`/api/auth/*`) and a few stateless service
//! endpoints. Every response body is a JSON envelope
//! `{ success, data?, message?, error? }`.
//!
//! # Design
//! - Records live in per-application [`RecordStore`]s; nothing is persisted
//!   and nothing is global, so each [`app`] call starts empty.
//! - Handlers return `Result<_, ApiError>`; failures become envelopes in one
//!   place, and panics are caught by a middleware layer.
//! - Ids in the URL are parsed leniently; an id that does not parse is
//!   reported as "not found" rather than "bad request".

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod state;
pub mod store;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

pub use config::Config;
pub use envelope::Envelope;
pub use error::ApiError;
pub use models::{Role, Status, Student, User};
pub use state::AppState;
pub use store::{Record, RecordStore};

use handlers::{auth, meta, students, users};

/// Router with default configuration and fresh, empty stores.
pub fn app() -> Router {
    app_with(Config::default())
}

pub fn app_with(config: Config) -> Router {
    let state = AppState::new(config);
    Router::new()
        .route("/", get(meta::banner))
        .route("/health", get(meta::health))
        .route("/api/info", get(meta::info))
        .route("/error", get(meta::fail))
        .route("/api/students", get(students::list).post(students::create))
        .route(
            "/api/students/{id}",
            get(students::fetch)
                .put(students::update)
                .delete(students::remove),
        )
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::fetch).put(users::update).delete(users::remove),
        )
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .fallback(meta::not_found)
        .method_not_allowed_fallback(meta::not_found)
        .layer(from_fn(middleware::catch_panic))
        .layer(from_fn(middleware::security_headers))
        .layer(from_fn(middleware::log_requests))
        .with_state(state)
}

/// Serve the default application on `listener` until the process stops.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Config::default()).await
}

pub async fn serve(listener: TcpListener, config: Config) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}
