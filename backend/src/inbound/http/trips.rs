//! Trip membership HTTP handlers.
//!
//! ```text
//! POST /api/v1/trips                        {"name":"Lisbon"}
//! POST /api/v1/trips/{trip_id}/join         {"code":"7F2KQ9"}
//! POST /api/v1/trips/{trip_id}/join-code
//! GET  /api/v1/trips/{trip_id}/attendees
//! ```
//!
//! Successful joins answer with a `Location` header naming the trip detail
//! view and `Cache-Control: no-store`, so clients refetch their trip list
//! instead of serving a stale "next trip" projection.

use actix_web::{HttpResponse, get, http::StatusCode, http::header, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Attendee, Error, TRIP_NOT_FOUND_MESSAGE, Trip, TripId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for joining a trip.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinTripRequest {
    /// The join code shared by the trip owner, compared exactly.
    pub code: Option<String>,
}

/// Request body for creating a trip.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub name: Option<String>,
}

/// Attendee as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub user_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub joined_at: String,
}

impl From<Attendee> for AttendeeResponse {
    fn from(value: Attendee) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            name: value.name,
            avatar_url: value.avatar_url,
            joined_at: value.joined_at.to_rfc3339(),
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinTripResponse {
    /// `joined` for a new membership, `already_joined` for a repeat.
    #[schema(example = "joined")]
    pub status: String,
    pub trip_id: String,
    /// Client route to navigate to.
    #[schema(example = "/trips/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub redirect_to: String,
    /// The new attendee row; absent for repeat joins.
    pub attendee: Option<AttendeeResponse>,
}

/// Trip as seen by its owner, including the current join code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedTripResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub join_code: String,
    pub created_at: String,
}

impl From<Trip> for OwnedTripResponse {
    fn from(value: Trip) -> Self {
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            name: value.name,
            join_code: value.join_code.expose().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Attendee listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendeesResponse {
    pub attendees: Vec<AttendeeResponse>,
}

fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// A path segment that is not a UUID cannot name a trip.
fn parse_trip_id(raw: &str) -> Result<TripId, Error> {
    TripId::new(raw).map_err(|_| {
        Error::not_found(TRIP_NOT_FOUND_MESSAGE)
            .with_details(json!({ "tripId": raw, "code": "trip_not_found" }))
    })
}

fn trip_location(trip_id: &TripId) -> String {
    format!("/trips/{trip_id}")
}

/// Join a trip with its join code.
#[utoipa::path(
    post,
    path = "/api/v1/trips/{trip_id}/join",
    request_body = JoinTripRequest,
    params(("trip_id" = String, Path, description = "Trip identifier")),
    responses(
        (
            status = 201,
            description = "Caller joined the trip",
            headers(("Location" = String, description = "Trip detail route")),
            body = JoinTripResponse
        ),
        (status = 200, description = "Caller was already an attendee", body = JoinTripResponse),
        (status = 400, description = "Join code does not match", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema),
        (status = 503, description = "Trip store unavailable; retry", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "joinTrip"
)]
#[post("/trips/{trip_id}/join")]
pub async fn join_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<JoinTripRequest>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let code = payload
        .into_inner()
        .code
        .ok_or_else(|| missing_field_error("code"))?;

    let membership = state
        .membership
        .join(trip_id, code, session.caller())
        .await
        .into_result(trip_id)?;

    let (status, label) = if membership.is_new() {
        (StatusCode::CREATED, "joined")
    } else {
        (StatusCode::OK, "already_joined")
    };
    let redirect_to = membership.redirect_path();
    let body = JoinTripResponse {
        status: label.to_owned(),
        trip_id: trip_id.to_string(),
        redirect_to: redirect_to.clone(),
        attendee: membership.attendee.map(AttendeeResponse::from),
    };

    Ok(HttpResponse::build(status)
        .insert_header((header::LOCATION, redirect_to))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(body))
}

/// Create a trip owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = OwnedTripResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "createTrip"
)]
#[post("/trips")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload
        .into_inner()
        .name
        .ok_or_else(|| missing_field_error("name"))?;
    let trip = state.membership.create_trip(session.caller(), name).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, trip_location(&trip.id)))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(OwnedTripResponse::from(trip)))
}

/// Replace the trip's join code. Owner only.
#[utoipa::path(
    post,
    path = "/api/v1/trips/{trip_id}/join-code",
    params(("trip_id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Join code rotated", body = OwnedTripResponse),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Caller does not own the trip", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "rotateJoinCode"
)]
#[post("/trips/{trip_id}/join-code")]
pub async fn rotate_join_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let trip = state
        .membership
        .rotate_join_code(session.caller(), trip_id)
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(OwnedTripResponse::from(trip)))
}

/// List a trip's attendees.
#[utoipa::path(
    get,
    path = "/api/v1/trips/{trip_id}/attendees",
    params(("trip_id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Attendees in join order", body = AttendeesResponse),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Caller is not a member", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "listAttendees"
)]
#[get("/trips/{trip_id}/attendees")]
pub async fn list_attendees(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let attendees = state
        .membership_query
        .list_attendees(session.caller(), trip_id)
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache, must-revalidate"))
        .json(AttendeesResponse {
            attendees: attendees.into_iter().map(AttendeeResponse::from).collect(),
        }))
}

#[cfg(test)]
#[path = "trips_tests.rs"]
mod tests;
