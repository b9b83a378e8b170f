//! Driven port for trip and attendee persistence.
//!
//! The membership service only needs two primitives to admit a user:
//! [`TripStore::get_trip_by_id`] and [`TripStore::insert_attendee_if_absent`].
//! Adapters must make the latter atomic per `(trip_id, user_id)` and report a
//! duplicate as [`InsertAttendeeOutcome::ConflictAlreadyExists`] rather than
//! as an error; the domain never inspects engine-specific error codes.

use async_trait::async_trait;

use crate::domain::{Attendee, JoinCode, NewAttendee, NewTrip, Trip, TripId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trip store adapters.
    pub enum TripStoreError {
        /// The store could not be reached.
        Connection { message: String } => "trip store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "trip store query failed: {message}",
    }
}

/// Result of a conditional attendee insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertAttendeeOutcome {
    /// The row was created by this call.
    Inserted(Attendee),
    /// A row for the same `(trip_id, user_id)` already existed.
    ConflictAlreadyExists,
}

/// Persistence port for trips and their attendees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Fetch a trip, including its current join code.
    async fn get_trip_by_id(&self, trip_id: &TripId) -> Result<Option<Trip>, TripStoreError>;

    /// Insert an attendee unless one already exists for the same pair.
    ///
    /// Concurrent calls for the same pair must yield exactly one
    /// [`InsertAttendeeOutcome::Inserted`].
    async fn insert_attendee_if_absent(
        &self,
        attendee: &NewAttendee,
    ) -> Result<InsertAttendeeOutcome, TripStoreError>;

    /// Persist a new trip.
    async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, TripStoreError>;

    /// Replace the join code of an existing trip.
    ///
    /// Returns `None` when the trip does not exist.
    async fn update_join_code(
        &self,
        trip_id: &TripId,
        join_code: &JoinCode,
    ) -> Result<Option<Trip>, TripStoreError>;

    /// List a trip's attendees ordered by join time.
    async fn list_attendees(&self, trip_id: &TripId) -> Result<Vec<Attendee>, TripStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn errors_render_their_cause() {
        assert_eq!(
            TripStoreError::connection("pool timeout").to_string(),
            "trip store connection failed: pool timeout"
        );
        assert_eq!(
            TripStoreError::query("relation missing").to_string(),
            "trip store query failed: relation missing"
        );
    }
}
