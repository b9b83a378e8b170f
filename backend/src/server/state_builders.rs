//! Builders for the HTTP adapter state.
//!
//! A configured database pool selects the Diesel adapters; otherwise the
//! service runs on in-memory adapters that provision users on first sight.

use std::sync::Arc;

use actix_web::web;

use trips_backend::domain::TripMembershipService;
use trips_backend::domain::ports::{IdentityProvider, JoinMetrics, TripStore};
use trips_backend::inbound::http::state::HttpState;
use trips_backend::outbound::memory::{InMemoryIdentityProvider, InMemoryTripStore};
use trips_backend::outbound::persistence::{DieselIdentityProvider, DieselTripStore};

#[cfg(feature = "metrics")]
use trips_backend::outbound::metrics::PrometheusJoinMetrics;

use super::ServerConfig;

fn http_state_from<S, I, M>(service: TripMembershipService<S, I, M>) -> HttpState
where
    S: TripStore + 'static,
    I: IdentityProvider + 'static,
    M: JoinMetrics + 'static,
{
    let service = Arc::new(service);
    HttpState::new(service.clone(), service)
}

/// Attach the Prometheus join counter when an exporter is configured.
#[cfg(feature = "metrics")]
fn instrument<S, I>(
    config: &ServerConfig,
    service: TripMembershipService<S, I>,
) -> std::io::Result<HttpState>
where
    S: TripStore + 'static,
    I: IdentityProvider + 'static,
{
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusJoinMetrics::new(&prom.registry).map_err(|err| {
                std::io::Error::other(format!("join metrics registration failed: {err}"))
            })?;
            Ok(http_state_from(service.with_metrics(Arc::new(metrics))))
        }
        None => Ok(http_state_from(service)),
    }
}

#[cfg(not(feature = "metrics"))]
fn instrument<S, I>(
    _config: &ServerConfig,
    service: TripMembershipService<S, I>,
) -> std::io::Result<HttpState>
where
    S: TripStore + 'static,
    I: IdentityProvider + 'static,
{
    Ok(http_state_from(service))
}

/// Build the shared handler state for `config`.
///
/// # Errors
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => instrument(
            config,
            TripMembershipService::new(
                Arc::new(DieselTripStore::new(pool.clone())),
                Arc::new(DieselIdentityProvider::new(pool.clone())),
            ),
        )?,
        None => instrument(
            config,
            TripMembershipService::new(
                Arc::new(InMemoryTripStore::default()),
                Arc::new(InMemoryIdentityProvider::auto_provisioning()),
            ),
        )?,
    };
    Ok(web::Data::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use rstest::rstest;
    use trips_backend::domain::ports::CallerIdentity;
    use trips_backend::domain::{JoinOutcome, TripId, UserId};
    use trips_backend::inbound::http::session_config::SessionSettings;

    fn config_without_pool() -> ServerConfig {
        ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_name: "session".to_owned(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            },
            "127.0.0.1:0".parse().expect("socket address"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn missing_pool_selects_in_memory_adapters() {
        let state = build_http_state(&config_without_pool()).expect("state builds");
        let caller = CallerIdentity::authenticated(UserId::random());

        let trip = state
            .membership
            .create_trip(caller, "Offline weekend".to_owned())
            .await
            .expect("in-memory create succeeds");
        let outcome = state
            .membership
            .join(trip.id, "wrong".to_owned(), caller)
            .await;

        assert_eq!(outcome, JoinOutcome::CodeMismatch);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_trip_is_reported_by_in_memory_store() {
        let state = build_http_state(&config_without_pool()).expect("state builds");

        let outcome = state
            .membership
            .join(
                TripId::random(),
                "7F2KQ9".to_owned(),
                CallerIdentity::authenticated(UserId::random()),
            )
            .await;

        assert_eq!(outcome, JoinOutcome::TripNotFound);
    }
}
