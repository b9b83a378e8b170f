//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use trips_backend::inbound::http::health::HealthState;
use trips_backend::inbound::http::session_config::fingerprint::key_fingerprint;
use trips_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use trips_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect(settings: &AppSettings, database_url: &str) -> std::io::Result<DbPool> {
    if settings.run_migrations {
        let url = database_url.to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
            .map_err(std::io::Error::other)?;
        info!(applied, "database migrations applied");
    }

    let config = PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
    DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool: {e}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie = %session.cookie_name,
        "session key loaded"
    );

    let mut config = ServerConfig::new(session, settings.bind_addr()?);
    match settings.database_url.as_deref() {
        Some(url) => config = config.with_db_pool(connect(&settings, url).await?),
        None => warn!("no database configured; using in-memory trip store"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(
        server::make_metrics()
            .inspect_err(|error| warn!(%error, "metrics disabled"))
            .ok(),
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = %settings.bind_addr()?, "server started");
    server.await
}
