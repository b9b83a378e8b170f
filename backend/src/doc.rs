//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the trip membership endpoints, the health probes,
//! and the error envelope. Swagger UI serves it in debug builds.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::trips::{
    AttendeeResponse, AttendeesResponse, CreateTripRequest, JoinTripRequest, JoinTripResponse,
    OwnedTripResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the identity provider at sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Trips backend API",
        description = "Trip creation, join-code membership, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::join_trip,
        crate::inbound::http::trips::rotate_join_code,
        crate::inbound::http::trips::list_attendees,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        JoinTripRequest,
        JoinTripResponse,
        CreateTripRequest,
        OwnedTripResponse,
        AttendeeResponse,
        AttendeesResponse,
    )),
    tags(
        (name = "trips", description = "Trip membership"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
