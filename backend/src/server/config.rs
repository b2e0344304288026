//! HTTP server configuration object and helpers.

use std::net::{AddrParseError, SocketAddr};

use chrono::Duration;
use clinic_backend::outbound::persistence::DbPool;
use clinic_backend::outbound::security::TokenSecret;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings read from `CLINIC_*` variables, configuration files, and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Lifetime of issued bearer tokens, in minutes.
    #[ortho_config(default = 60)]
    pub token_ttl_minutes: i64,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Token lifetime, falling back to one hour for non-positive values.
    pub fn token_ttl(&self) -> Duration {
        let minutes = Some(self.token_ttl_minutes)
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        Duration::minutes(minutes)
    }

    /// Pool size, falling back to ten connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: TokenSecret,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration signing tokens with `token_secret` and serving from the
    /// in-memory store until a pool is attached.
    #[must_use]
    pub fn new(token_secret: TokenSecret, bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            token_secret,
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, users and records are stored in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the lifetime of issued tokens.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "CLINIC_BIND_ADDR",
        "CLINIC_DATABASE_URL",
        "CLINIC_TOKEN_TTL_MINUTES",
        "CLINIC_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("clinic-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.token_ttl(), Duration::minutes(60));
        assert_eq!(settings.db_max_connections(), 10);
    }

    #[rstest]
    fn a_clean_environment_loads_without_error() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = ServerSettings::load_from_iter([OsString::from("clinic-backend")]);
        let settings = settings.expect("defaults alone should satisfy the loader");
        assert_eq!(settings.token_ttl_minutes, 60);
        assert!(settings.bind_addr.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLINIC_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "CLINIC_DATABASE_URL",
                Some("postgres://clinic@localhost/clinic".to_owned()),
            ),
            ("CLINIC_TOKEN_TTL_MINUTES", Some("5".to_owned())),
            ("CLINIC_DB_MAX_CONNECTIONS", Some("3".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override address").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://clinic@localhost/clinic")
        );
        assert_eq!(settings.token_ttl(), Duration::minutes(5));
        assert_eq!(settings.db_max_connections(), 3);
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn unusable_ttls_fall_back_to_an_hour(#[case] minutes: i64) {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: None,
            token_ttl_minutes: minutes,
            db_max_connections: None,
        };
        assert_eq!(settings.token_ttl(), Duration::minutes(60));
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            database_url: None,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            db_max_connections: None,
        };
        assert!(settings.bind_addr().is_err());
    }
}
