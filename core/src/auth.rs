//! Login, logout and session checks on top of [`HttpClient`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::HttpClient;
use crate::error::{ActionError, ActionResult};
use crate::session::Session;
use crate::types::{Credentials, LoginData, User};

pub const LOGIN_FAILED: &str = "Error al iniciar sesión";

pub struct AuthStore {
    http: Arc<HttpClient>,
}

impl AuthStore {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.http.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.session().user()
    }

    /// Exchange credentials for a session. On success the token is
    /// persisted and the signed-in user returned.
    pub fn login(&self, credentials: &Credentials) -> ActionResult<User> {
        match self.http.login(credentials) {
            Ok(LoginData { token, user }) => {
                info!(username = %user.username, "logged in");
                self.session().establish(token, user.clone());
                Ok(user)
            }
            Err(error) => {
                debug!(%error, "login failed");
                Err(ActionError::from_api(&error, LOGIN_FAILED))
            }
        }
    }

    pub fn logout(&self) {
        self.session().clear();
    }

    /// Confirm the stored token with the server. Without a token this
    /// answers `false` without a request; a rejected token logs out.
    pub fn check_auth(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match self.http.me() {
            Ok(user) => {
                self.session().set_user(user);
                true
            }
            Err(error) => {
                debug!(%error, "stored session is no longer valid");
                self.logout();
                false
            }
        }
    }
}
