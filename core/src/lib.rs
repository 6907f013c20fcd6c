//! Client core for the student management API.
//!
//! # Overview
//! [`ApiClient`] builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. A [`Transport`] performs the round-trip and
//! [`HttpClient`] applies the session policy (bearer token, 401 teardown) on
//! top. The stores ([`AuthStore`], [`CollectionStore`]) and the composables
//! expose their state as [`Signal`]s that views subscribe to.
//!
//! # Design
//! - Everything is synchronous; a store action blocks for one round-trip.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.
//! - Store actions never return transport errors directly. They return an
//!   [`ActionError`] whose message is ready for display.

pub mod api;
pub mod auth;
pub mod client;
pub mod collection;
pub mod composables;
pub mod config;
pub mod context;
pub mod error;
pub mod helpers;
pub mod http;
pub mod routes;
pub mod session;
pub mod signal;
pub mod transport;
pub mod types;

pub use api::HttpClient;
pub use auth::AuthStore;
pub use client::ApiClient;
pub use collection::CollectionStore;
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ActionError, ActionResult, ApiError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routes::{Location, Navigator, Resolution, Router};
pub use session::{FileStorage, MemoryStorage, Session, TokenStorage};
pub use signal::{Signal, Subscription};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Credentials, Entity, LoginData, NewStudent, NewUser, Role, Status, Student, StudentPatch, User, UserPatch,
};
