//! Server configuration.
//!
//! Every option can be given as a flag or through the process environment;
//! flags win over environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

use crate::logging::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "student-server",
    version,
    about = "In-memory student and user management API"
)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, short, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Deployment environment reported by the banner endpoint.
    #[arg(long = "env", env = "APP_ENV", default_value = "development")]
    pub environment: String,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Host name reported by the banner endpoint. Defaults to the machine's
    /// host name.
    #[arg(long, env = "HOSTNAME")]
    pub hostname: Option<String>,

    /// Username of the administrator account seeded at startup.
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@example.com")]
    pub admin_email: String,

    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123", hide_env_values = true)]
    pub admin_password: String,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The configured host name, or the one the operating system reports.
    pub fn hostname(&self) -> String {
        self.hostname
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(machine_hostname)
    }
}

fn machine_hostname() -> String {
    let name = gethostname::gethostname().to_string_lossy().into_owned();
    if name.is_empty() {
        "localhost".to_string()
    } else {
        name
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            environment: "development".to_string(),
            log_format: LogFormat::default(),
            hostname: None,
            admin_username: "admin".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "student-server",
            "--port",
            "8080",
            "--env",
            "production",
            "--log-format",
            "json",
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "production");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn listen_addr_combines_host_and_port() {
        let config = Config {
            port: 4000,
            ..Config::default()
        };
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn hostname_falls_back_to_the_machine() {
        let config = Config {
            hostname: Some("node-1".to_string()),
            ..Config::default()
        };
        assert_eq!(config.hostname(), "node-1");

        let machine = gethostname::gethostname().to_string_lossy().into_owned();
        let unset = Config::default();
        assert!(!unset.hostname().is_empty());
        if !machine.is_empty() {
            assert_eq!(unset.hostname(), machine);
        }

        let blank = Config {
            hostname: Some("  ".to_string()),
            ..Config::default()
        };
        assert_eq!(blank.hostname(), unset.hostname());
    }
}
