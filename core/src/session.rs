//! Client-side session state and its durable token storage.
//!
//! # Design
//! `Session` holds the bearer token and the current user as signals so views
//! can subscribe to them. Only the token is persisted, under the single key
//! [`TOKEN_KEY`]; it is read once when the session is created and written on
//! login and logout.
//!
//! The session also carries an expiry latch. The first 401 seen after a
//! login wins the latch and triggers the redirect; later 401s from requests
//! that were already in flight only clear state again.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tracing::warn;

use crate::signal::{lock, Signal};
use crate::types::User;

pub const TOKEN_KEY: &str = "token";

/// Durable home of the session token.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    token: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *lock(&self.token) = None;
        Ok(())
    }
}

/// Stores the token in a file named [`TOKEN_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileStorage {
    fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

pub struct Session {
    token: Signal<Option<String>>,
    user: Signal<Option<User>>,
    storage: Arc<dyn TokenStorage>,
    expired: AtomicBool,
}

impl Session {
    /// Rehydrate the token from `storage`. The user is unknown until the
    /// next login or auth check.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            token: Signal::new(storage.load()),
            user: Signal::new(None),
            storage,
            expired: AtomicBool::new(false),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.with(Option::is_some)
    }

    pub fn token_signal(&self) -> &Signal<Option<String>> {
        &self.token
    }

    pub fn user_signal(&self) -> &Signal<Option<User>> {
        &self.user
    }

    /// Record a successful login and re-arm the expiry latch.
    pub fn establish(&self, token: String, user: User) {
        if let Err(error) = self.storage.save(&token) {
            warn!(%error, "failed to persist session token");
        }
        self.token.set(Some(token));
        self.user.set(Some(user));
        self.expired.store(false, Ordering::Release);
    }

    pub fn set_user(&self, user: User) {
        self.user.set(Some(user));
    }

    /// Forget the token and user, in memory and in storage.
    pub fn clear(&self) {
        self.token.set(None);
        self.user.set(None);
        if let Err(error) = self.storage.clear() {
            warn!(%error, "failed to remove persisted session token");
        }
    }

    /// Clear the session after a 401. Returns `true` only for the first call
    /// since the last [`establish`](Session::establish), so the caller
    /// redirects once.
    pub fn expire(&self) -> bool {
        let first = !self.expired.swap(true, Ordering::AcqRel);
        self.clear();
        first
    }
}
