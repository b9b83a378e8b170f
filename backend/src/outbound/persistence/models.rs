//! Internal Diesel row structs.
//!
//! These types never leave the persistence adapter; conversions into domain
//! values live next to the queries that produce them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{trip_attendees, trips, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Row read from `trips`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub join_code: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable trip.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub join_code: &'a str,
}

/// Row read from `trip_attendees`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trip_attendees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendeeRow {
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// Insertable attendee; `joined_at` defaults to `now()`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trip_attendees)]
pub(crate) struct NewAttendeeRow<'a> {
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub avatar_url: Option<&'a str>,
}
