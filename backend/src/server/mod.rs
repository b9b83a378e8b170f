//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod settings;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::make_metrics;
pub use settings::AppSettings;

#[cfg(feature = "metrics")]
use metrics::PrometheusLayer;
use state_builders::build_http_state;

use actix_session::{SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use trips_backend::Trace;
#[cfg(debug_assertions)]
use trips_backend::doc::ApiDoc;
use trips_backend::inbound::http::health::{HealthState, live, ready};
use trips_backend::inbound::http::session_config::SessionSettings;
use trips_backend::inbound::http::state::HttpState;
use trips_backend::inbound::http::trips::{
    create_trip, join_trip, list_attendees, rotate_join_code,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn session_middleware(session: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), session.key.clone())
        .cookie_name(session.cookie_name.clone())
        .cookie_path("/".into())
        .cookie_secure(session.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(session.same_site)
        .build()
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: &SessionSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let api = web::scope("/api/v1")
        .wrap(session_middleware(session))
        .service(create_trip)
        .service(join_trip)
        .service(rotate_join_code)
        .service(list_attendees);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server for `config`.
///
/// The returned [`Server`] must be awaited to drive the listener. Health
/// readiness is flipped once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when metric registration, binding the
/// socket, or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        session,
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = PrometheusLayer::new(prometheus);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone(), &session);

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    fn dev_session() -> SessionSettings {
        SessionSettings {
            key: Key::generate(),
            cookie_name: "session".to_owned(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn join_without_a_session_is_unauthorised() {
        let session = dev_session();
        let config = ServerConfig::new(dev_session(), "127.0.0.1:0".parse().expect("addr"));
        let http_state = build_http_state(&config).expect("state");
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            http_state,
            &session,
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/trips/3fa85f64-5717-4562-b3fc-2c963f66afa6/join")
                .set_json(json!({ "code": "7F2KQ9" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key("trace-id"));
    }

    #[rstest]
    #[actix_web::test]
    async fn probes_are_mounted_outside_the_api_scope() {
        let session = dev_session();
        let config = ServerConfig::new(dev_session(), "127.0.0.1:0".parse().expect("addr"));
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(
            health,
            build_http_state(&config).expect("state"),
            &session,
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
