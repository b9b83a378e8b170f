//! PostgreSQL-backed `TripStore` implementation using Diesel.
//!
//! Attendee admission relies on the `trip_attendees` primary key: a plain
//! insert either creates the row or fails with a unique violation, which is
//! reported as [`InsertAttendeeOutcome::ConflictAlreadyExists`]. No explicit
//! transaction or row lock is taken.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InsertAttendeeOutcome, TripStore, TripStoreError};
use crate::domain::{Attendee, JoinCode, NewAttendee, NewTrip, Trip, TripId, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AttendeeRow, NewAttendeeRow, NewTripRow, TripRow};
use super::pool::{DbPool, PoolError};
use super::schema::{trip_attendees, trips};

/// Diesel-backed implementation of the [`TripStore`] port.
#[derive(Clone)]
pub struct DieselTripStore {
    pool: DbPool,
}

impl DieselTripStore {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> TripStoreError {
    map_pool_error(error, TripStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TripStoreError {
    map_diesel_error(error, TripStoreError::query, TripStoreError::connection)
}

fn row_to_trip(row: TripRow) -> Result<Trip, TripStoreError> {
    let join_code = JoinCode::new(row.join_code)
        .map_err(|err| TripStoreError::query(format!("invalid join code in database: {err}")))?;
    Ok(Trip {
        id: TripId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        name: row.name,
        join_code,
        created_at: row.created_at,
    })
}

fn row_to_attendee(row: AttendeeRow) -> Attendee {
    Attendee {
        trip_id: TripId::from_uuid(row.trip_id),
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        avatar_url: row.avatar_url,
        joined_at: row.joined_at,
    }
}

#[async_trait]
impl TripStore for DieselTripStore {
    async fn get_trip_by_id(&self, trip_id: &TripId) -> Result<Option<Trip>, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<TripRow> = trips::table
            .find(*trip_id.as_uuid())
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_trip).transpose()
    }

    async fn insert_attendee_if_absent(
        &self,
        attendee: &NewAttendee,
    ) -> Result<InsertAttendeeOutcome, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let new_row = NewAttendeeRow {
            trip_id: *attendee.trip_id.as_uuid(),
            user_id: *attendee.user_id.as_uuid(),
            name: attendee.name.as_str(),
            avatar_url: attendee.avatar_url.as_deref(),
        };

        let inserted = diesel::insert_into(trip_attendees::table)
            .values(&new_row)
            .returning(AttendeeRow::as_returning())
            .get_result(&mut conn)
            .await;

        match inserted {
            Ok(row) => Ok(InsertAttendeeOutcome::Inserted(row_to_attendee(row))),
            Err(err) if is_unique_violation(&err) => Ok(InsertAttendeeOutcome::ConflictAlreadyExists),
            Err(err) => Err(diesel_error(err)),
        }
    }

    async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let new_row = NewTripRow {
            id: *trip.id().as_uuid(),
            owner_id: *trip.owner_id().as_uuid(),
            name: trip.name(),
            join_code: trip.join_code().expose(),
        };

        let row: TripRow = diesel::insert_into(trips::table)
            .values(&new_row)
            .returning(TripRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        row_to_trip(row)
    }

    async fn update_join_code(
        &self,
        trip_id: &TripId,
        join_code: &JoinCode,
    ) -> Result<Option<Trip>, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<TripRow> = diesel::update(trips::table.find(*trip_id.as_uuid()))
            .set(trips::join_code.eq(join_code.expose()))
            .returning(TripRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_trip).transpose()
    }

    async fn list_attendees(&self, trip_id: &TripId) -> Result<Vec<Attendee>, TripStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<AttendeeRow> = trip_attendees::table
            .filter(trip_attendees::trip_id.eq(trip_id.as_uuid()))
            .order((trip_attendees::joined_at.asc(), trip_attendees::user_id.asc()))
            .select(AttendeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows.into_iter().map(row_to_attendee).collect())
    }
}
