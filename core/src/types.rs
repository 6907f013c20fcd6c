//! Domain DTOs for the student/user API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently so
//! the client does not link the server. The integration tests catch schema
//! drift between the two crates.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// The `{ success, data?, message?, error? }` wrapper around every response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// A record type served by a CRUD resource.
pub trait Entity: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Payload for creating a record.
    type Draft: Serialize;
    /// Payload for a partial update.
    type Patch: Serialize;

    /// Collection path, e.g. `/api/users`.
    const RESOURCE: &'static str;
    /// Singular and plural nouns used in user-facing messages.
    const NOUN: &'static str;
    const PLURAL: &'static str;

    fn id(&self) -> u64;
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

/// A stored student. The server keeps each field exactly as it was posted,
/// so `edad` may come back as `20`, `"20"` or `20.5`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: Value,
    #[serde(rename = "edad")]
    pub age: Value,
    #[serde(rename = "carrera")]
    pub program: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "carrera")]
    pub program: String,
}

/// Only the fields that are `Some` are sent. The server ignores empty strings
/// and `0`, so those cannot be used to blank a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentPatch {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "edad", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "carrera", skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl Entity for Student {
    type Draft = NewStudent;
    type Patch = StudentPatch;

    const RESOURCE: &'static str = "/api/students";
    const NOUN: &'static str = "estudiante";
    const PLURAL: &'static str = "estudiantes";

    fn id(&self) -> u64 {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Guest,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::User => "Usuario",
            Role::Guest => "Invitado",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Pending,
    Blocked,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "Activo",
            Status::Inactive => "Inactivo",
            Status::Pending => "Pendiente",
            Status::Blocked => "Bloqueado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl Entity for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const RESOURCE: &'static str = "/api/users";
    const NOUN: &'static str = "usuario";
    const PLURAL: &'static str = "usuarios";

    fn id(&self) -> u64 {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `data` of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}
