//! Records served by the API and the request bodies that create or patch them.
//!
//! # Design
//! Request bodies deserialize every field as `Option` so that a missing field
//! surfaces as a validation error (400 with the envelope) rather than a JSON
//! rejection. A field only counts as provided when it is also truthy: an empty
//! string or a numeric `0` is treated exactly like an absent field, both when
//! creating and when patching a record.
//!
//! Student fields are checked for presence only and stored as given, so
//! `"edad": "20"` stays a string and `"edad": 20.5` stays a number.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Record;

/// Keep `value` only when it is a non-empty string.
fn provided(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// JSON truthiness: `null`, `false`, `0`, `-0` and `""` are falsy, every other
/// value (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy(value: Option<Value>) -> Option<Value> {
    value.filter(is_truthy)
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: Value,
    #[serde(rename = "edad")]
    pub age: Value,
    #[serde(rename = "carrera")]
    pub program: Value,
}

/// Body of `POST /api/students` and `PUT /api/students/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct StudentFields {
    #[serde(rename = "nombre", default)]
    pub name: Option<Value>,
    #[serde(rename = "edad", default)]
    pub age: Option<Value>,
    #[serde(rename = "carrera", default)]
    pub program: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct StudentDraft {
    pub name: Value,
    pub age: Value,
    pub program: Value,
}

impl StudentFields {
    /// `None` when any of the three fields is missing or falsy.
    pub fn into_draft(self) -> Option<StudentDraft> {
        Some(StudentDraft {
            name: truthy(self.name)?,
            age: truthy(self.age)?,
            program: truthy(self.program)?,
        })
    }
}

impl Record for Student {
    type Draft = StudentDraft;
    type Patch = StudentFields;

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: StudentDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            program: draft.program,
        }
    }

    fn apply(&mut self, patch: StudentFields) {
        if let Some(name) = truthy(patch.name) {
            self.name = name;
        }
        if let Some(age) = truthy(patch.age) {
            self.age = age;
        }
        if let Some(program) = truthy(patch.program) {
            self.program = program;
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Guest,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Pending,
    Blocked,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: Status,
    #[serde(skip)]
    password: Option<String>,
}

impl User {
    /// Plain comparison; tokens and passwords are opaque in this service.
    pub fn check_password(&self, candidate: &str) -> bool {
        self.status != Status::Blocked && self.password.as_deref() == Some(candidate)
    }
}

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UserFields {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Clone)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Role,
    pub status: Status,
}

impl UserFields {
    /// `None` when `username` or `email` is missing or empty.
    pub fn into_draft(self) -> Option<UserDraft> {
        Some(UserDraft {
            username: provided(self.username)?,
            email: provided(self.email)?,
            password: provided(self.password),
            role: self.role.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        })
    }
}

impl Record for User {
    type Draft = UserDraft;
    type Patch = UserFields;

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: UserDraft) -> Self {
        Self {
            id,
            username: draft.username,
            email: draft.email,
            role: draft.role,
            status: draft.status,
            password: draft.password,
        }
    }

    fn apply(&mut self, patch: UserFields) {
        if let Some(username) = provided(patch.username) {
            self.username = username;
        }
        if let Some(email) = provided(patch.email) {
            self.email = email;
        }
        if let Some(password) = provided(patch.password) {
            self.password = Some(password);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn into_parts(self) -> Option<(String, String)> {
        Some((provided(self.username)?, provided(self.password)?))
    }
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}
