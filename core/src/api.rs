//! The authenticated HTTP client every store goes through.
//!
//! # Design
//! `HttpClient` pairs the stateless [`ApiClient`] with a [`Transport`] and
//! applies the session policy to every exchange:
//!
//! - outgoing requests carry `Authorization: Bearer <token>` while the
//!   session has a token;
//! - a 401 response clears the session and redirects to the login route,
//!   and the error still reaches the caller.
//!
//! When several requests fail with 401 together, only the first one to
//! report it redirects; see [`Session::expire`].

use std::sync::Arc;

use tracing::warn;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::routes::{Navigator, LOGIN_ROUTE};
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Credentials, Entity, LoginData, User};

pub struct HttpClient {
    api: ApiClient,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl HttpClient {
    pub fn new(
        api: ApiClient,
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            transport,
            session,
            navigator,
        }
    }

    /// Client over the network with a `ureq` transport.
    pub fn from_config(config: &ClientConfig, session: Arc<Session>, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(
            ApiClient::new(&config.base_url),
            Arc::new(UreqTransport::new(config.timeout)),
            session,
            navigator,
        )
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Execute `request` under the session policy. Non-2xx responses,
    /// including 401, are returned as `Ok` for the parser to classify.
    pub fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if let Some(token) = self.session.token() {
            request.set_header("authorization", format!("Bearer {token}"));
        }

        let path = request.path.clone();
        let response = self.transport.execute(request)?;

        if response.status == 401 && self.session.expire() {
            warn!(%path, "session rejected by the server, redirecting to login");
            self.navigator.redirect(LOGIN_ROUTE);
        }
        Ok(response)
    }

    pub fn list<E: Entity>(&self) -> Result<Vec<E>, ApiError> {
        let response = self.send(self.api.build_list::<E>())?;
        self.api.parse_list::<E>(response)
    }

    pub fn get<E: Entity>(&self, id: u64) -> Result<E, ApiError> {
        let response = self.send(self.api.build_get::<E>(id))?;
        self.api.parse_get::<E>(response)
    }

    pub fn create<E: Entity>(&self, input: &E::Draft) -> Result<E, ApiError> {
        let response = self.send(self.api.build_create::<E>(input)?)?;
        self.api.parse_create::<E>(response)
    }

    pub fn update<E: Entity>(&self, id: u64, input: &E::Patch) -> Result<E, ApiError> {
        let response = self.send(self.api.build_update::<E>(id, input)?)?;
        self.api.parse_update::<E>(response)
    }

    pub fn delete<E: Entity>(&self, id: u64) -> Result<E, ApiError> {
        let response = self.send(self.api.build_delete::<E>(id))?;
        self.api.parse_delete::<E>(response)
    }

    pub fn login(&self, credentials: &Credentials) -> Result<LoginData, ApiError> {
        let response = self.send(self.api.build_login(credentials)?)?;
        self.api.parse_login(response)
    }

    pub fn me(&self) -> Result<User, ApiError> {
        let response = self.send(self.api.build_me())?;
        self.api.parse_me(response)
    }
}
