//! Wiring of the client stores around one shared session.

use std::sync::Arc;

use crate::api::HttpClient;
use crate::auth::AuthStore;
use crate::client::ApiClient;
use crate::collection::CollectionStore;
use crate::config::ClientConfig;
use crate::routes::{Location, Navigator};
use crate::session::{Session, TokenStorage};
use crate::transport::Transport;
use crate::types::{Student, User};

/// Everything a view needs: the HTTP client, the auth store and one
/// collection store per resource, all sharing a session.
pub struct AppContext {
    pub http: Arc<HttpClient>,
    pub auth: AuthStore,
    pub users: CollectionStore<User>,
    pub students: CollectionStore<Student>,
    pub location: Location,
}

impl AppContext {
    /// Context talking to the configured server over `ureq`.
    pub fn new(config: &ClientConfig, storage: Arc<dyn TokenStorage>) -> Self {
        let location = Location::default();
        let session = Arc::new(Session::new(storage));
        let navigator: Arc<dyn Navigator> = Arc::new(location.clone());
        Self::assemble(HttpClient::from_config(config, session, navigator), location)
    }

    /// Context over a custom transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>, storage: Arc<dyn TokenStorage>) -> Self {
        let location = Location::default();
        let session = Arc::new(Session::new(storage));
        let navigator: Arc<dyn Navigator> = Arc::new(location.clone());
        let http = HttpClient::new(ApiClient::new(base_url), transport, session, navigator);
        Self::assemble(http, location)
    }

    fn assemble(http: HttpClient, location: Location) -> Self {
        let http = Arc::new(http);
        Self {
            auth: AuthStore::new(Arc::clone(&http)),
            users: CollectionStore::new(Arc::clone(&http)),
            students: CollectionStore::new(Arc::clone(&http)),
            location,
            http,
        }
    }
}
