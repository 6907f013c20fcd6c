//! Shared application state.
//!
//! # Design
//! Each store sits behind its own `RwLock` so the router can share it across
//! handler tasks; handlers hold a lock only for the duration of one store
//! operation. Sessions map opaque bearer tokens to user ids.

use std::{collections::HashMap, sync::Arc, time::Instant};

use tokio::sync::RwLock;

use crate::config::Config;
use crate::models::{Role, Status, Student, User, UserDraft};
use crate::store::RecordStore;

pub type Shared<T> = Arc<RwLock<T>>;

#[derive(Clone)]
pub struct AppState {
    pub students: Shared<RecordStore<Student>>,
    pub users: Shared<RecordStore<User>>,
    pub sessions: Shared<HashMap<String, u64>>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}

impl AppState {
    /// Fresh state with empty stores and the configured administrator seeded
    /// as user 1.
    pub fn new(config: Config) -> Self {
        let mut users = RecordStore::new();
        users.insert(UserDraft {
            username: config.admin_username.clone(),
            email: config.admin_email.clone(),
            password: Some(config.admin_password.clone()),
            role: Role::Admin,
            status: Status::Active,
        });

        Self {
            students: Arc::new(RwLock::new(RecordStore::new())),
            users: Arc::new(RwLock::new(users)),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
