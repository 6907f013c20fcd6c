//! Client configuration.

use std::time::Duration;

pub const FALLBACK_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL baked in at build time through `STUDENT_API_URL`.
pub const BUILD_BASE_URL: Option<&str> = option_env!("STUDENT_API_URL");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(BUILD_BASE_URL.unwrap_or(FALLBACK_BASE_URL))
    }
}
