//! Route registry and navigation.
//!
//! # Design
//! A [`Router`] is an explicit table from path to a lazily built view. The
//! view type is left to the embedding UI. [`Router::resolve`] applies the
//! auth guard and the catch-all redirect, and computes the document title.

use std::sync::Arc;

use tracing::debug;

use crate::signal::Signal;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";
pub const APP_TITLE: &str = "Sistema de Gestión";

/// Sends the client to another location.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// In-process location: the current path as a signal.
#[derive(Debug, Clone)]
pub struct Location {
    path: Signal<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new(HOME_ROUTE)
    }
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Signal::new(path.into()),
        }
    }

    pub fn path(&self) -> String {
        self.path.get()
    }

    pub fn signal(&self) -> &Signal<String> {
        &self.path
    }
}

impl Navigator for Location {
    fn redirect(&self, path: &str) {
        debug!(path, "navigating");
        self.path.set(path.to_string());
    }
}

/// Document title for a route title, or the bare app title.
pub fn document_title(title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{title} - {APP_TITLE}"),
        None => APP_TITLE.to_string(),
    }
}

type Loader<V> = Arc<dyn Fn() -> V + Send + Sync>;

pub struct Route<V> {
    pub path: &'static str,
    pub name: &'static str,
    pub title: Option<&'static str>,
    pub requires_auth: bool,
    loader: Loader<V>,
}

impl<V> Clone for Route<V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path,
            name: self.name,
            title: self.title,
            requires_auth: self.requires_auth,
            loader: Arc::clone(&self.loader),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<V> {
    Render {
        name: &'static str,
        title: String,
        view: V,
    },
    Redirect {
        to: String,
    },
}

pub struct Router<V> {
    routes: Vec<Route<V>>,
}

impl<V> Default for Router<V> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<V> Router<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a public route.
    pub fn route(
        self,
        path: &'static str,
        name: &'static str,
        title: &'static str,
        loader: impl Fn() -> V + Send + Sync + 'static,
    ) -> Self {
        self.push(path, name, title, false, loader)
    }

    /// Register a route that needs an authenticated session.
    pub fn protected(
        self,
        path: &'static str,
        name: &'static str,
        title: &'static str,
        loader: impl Fn() -> V + Send + Sync + 'static,
    ) -> Self {
        self.push(path, name, title, true, loader)
    }

    pub fn routes(&self) -> &[Route<V>] {
        &self.routes
    }

    /// Resolve `path` (optionally with a query string) for the current auth
    /// state.
    pub fn resolve(&self, path: &str, authenticated: bool) -> Resolution<V> {
        let route_path = path.split(['?', '#']).next().unwrap_or(path);
        let Some(route) = self.routes.iter().find(|route| route.path == route_path) else {
            return Resolution::Redirect {
                to: HOME_ROUTE.to_string(),
            };
        };

        if route.requires_auth && !authenticated {
            return Resolution::Redirect {
                to: format!("{LOGIN_ROUTE}?redirect={path}"),
            };
        }
        if route.path == LOGIN_ROUTE && authenticated {
            return Resolution::Redirect {
                to: HOME_ROUTE.to_string(),
            };
        }

        Resolution::Render {
            name: route.name,
            title: document_title(route.title),
            view: (route.loader)(),
        }
    }

    fn push(
        mut self,
        path: &'static str,
        name: &'static str,
        title: &'static str,
        requires_auth: bool,
        loader: impl Fn() -> V + Send + Sync + 'static,
    ) -> Self {
        self.routes.push(Route {
            path,
            name,
            title: Some(title).filter(|title| !title.is_empty()),
            requires_auth,
            loader: Arc::new(loader),
        });
        self
    }
}

/// The application's routes: login, home and the users page.
pub fn app_routes<V>(
    login: impl Fn() -> V + Send + Sync + 'static,
    home: impl Fn() -> V + Send + Sync + 'static,
    users: impl Fn() -> V + Send + Sync + 'static,
) -> Router<V> {
    Router::new()
        .route(LOGIN_ROUTE, "login", "Iniciar Sesión", login)
        .protected(HOME_ROUTE, "home", "Inicio", home)
        .protected("/users", "users", "Usuarios", users)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router<&'static str> {
        app_routes(|| "login-view", || "home-view", || "users-view")
    }

    #[test]
    fn protected_route_redirects_anonymous_visitor() {
        assert_eq!(
            router().resolve("/users", false),
            Resolution::Redirect {
                to: "/login?redirect=/users".to_string()
            }
        );
    }

    #[test]
    fn protected_route_renders_with_title() {
        assert_eq!(
            router().resolve("/users", true),
            Resolution::Render {
                name: "users",
                title: "Usuarios - Sistema de Gestión".to_string(),
                view: "users-view",
            }
        );
    }

    #[test]
    fn login_redirects_home_when_authenticated() {
        assert_eq!(
            router().resolve("/login", true),
            Resolution::Redirect { to: "/".to_string() }
        );
        assert!(matches!(
            router().resolve("/login?redirect=/users", false),
            Resolution::Render { name: "login", .. }
        ));
    }

    #[test]
    fn unknown_path_goes_home() {
        assert_eq!(
            router().resolve("/nowhere/at/all", true),
            Resolution::Redirect { to: "/".to_string() }
        );
    }

    #[test]
    fn untitled_route_uses_app_title() {
        let router = Router::new().route("/about", "about", "", || ());
        match router.resolve("/about", false) {
            Resolution::Render { title, .. } => assert_eq!(title, "Sistema de Gestión"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn location_records_redirects() {
        let location = Location::default();
        location.redirect(LOGIN_ROUTE);
        assert_eq!(location.path(), "/login");
    }
}
