//! Application settings loaded via OrthoConfig.
//!
//! Layers: defaults, then a configuration file, then `TRIPS_*` environment
//! variables, then command-line flags.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Top-level service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRIPS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the service runs on in-memory adapters.
    pub database_url: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid TRIPS_BIND_ADDR '{raw}': {err}"),
            )
        })
    }

    /// Configured pool size, falling back to ten.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "TRIPS_BIND_ADDR",
        "TRIPS_DATABASE_URL",
        "TRIPS_RUN_MIGRATIONS",
        "TRIPS_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("trips-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(!settings.run_migrations);
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TRIPS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "TRIPS_DATABASE_URL",
                Some("postgres://trips@localhost/trips".to_owned()),
            ),
            ("TRIPS_RUN_MIGRATIONS", Some("true".to_owned())),
            ("TRIPS_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://trips@localhost/trips")
        );
        assert!(settings.run_migrations);
        assert_eq!(settings.db_max_connections(), 4);
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env([
            ("TRIPS_BIND_ADDR", Some("not-an-address".to_owned())),
            ("TRIPS_DATABASE_URL", None),
            ("TRIPS_RUN_MIGRATIONS", None),
            ("TRIPS_DB_MAX_CONNECTIONS", None),
        ]);

        let err = load_from_empty_args()
            .bind_addr()
            .expect_err("address should not parse");

        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
