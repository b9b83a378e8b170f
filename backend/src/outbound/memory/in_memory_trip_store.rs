//! `TripStore` backed by a mutex-guarded map.
//!
//! The check-and-insert for attendees happens inside one critical section,
//! which plays the role of the database's primary key constraint.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{InsertAttendeeOutcome, TripStore, TripStoreError};
use crate::domain::{Attendee, JoinCode, NewAttendee, NewTrip, Trip, TripId, UserId};

#[derive(Default)]
struct State {
    trips: HashMap<TripId, Trip>,
    attendees: HashMap<(TripId, UserId), Attendee>,
}

/// In-memory implementation of the [`TripStore`] port.
pub struct InMemoryTripStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryTripStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryTripStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, TripStoreError> {
        self.state
            .lock()
            .map_err(|_| TripStoreError::query("in-memory trip store lock poisoned"))
    }

    /// Insert or replace a trip directly, bypassing creation rules.
    pub fn seed_trip(&self, trip: Trip) -> Result<(), TripStoreError> {
        self.lock()?.trips.insert(trip.id, trip);
        Ok(())
    }

    /// Number of attendee rows for `trip_id`.
    pub fn attendee_count(&self, trip_id: &TripId) -> Result<usize, TripStoreError> {
        let state = self.lock()?;
        Ok(state
            .attendees
            .keys()
            .filter(|(trip, _)| trip == trip_id)
            .count())
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn get_trip_by_id(&self, trip_id: &TripId) -> Result<Option<Trip>, TripStoreError> {
        Ok(self.lock()?.trips.get(trip_id).cloned())
    }

    async fn insert_attendee_if_absent(
        &self,
        attendee: &NewAttendee,
    ) -> Result<InsertAttendeeOutcome, TripStoreError> {
        let mut state = self.lock()?;
        if !state.trips.contains_key(&attendee.trip_id) {
            return Err(TripStoreError::query("referenced record missing"));
        }
        let key = (attendee.trip_id, attendee.user_id);
        if state.attendees.contains_key(&key) {
            return Ok(InsertAttendeeOutcome::ConflictAlreadyExists);
        }
        let row = attendee.clone().into_attendee(self.clock.utc());
        state.attendees.insert(key, row.clone());
        Ok(InsertAttendeeOutcome::Inserted(row))
    }

    async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, TripStoreError> {
        let mut state = self.lock()?;
        if state.trips.contains_key(trip.id()) {
            return Err(TripStoreError::query("trip already exists"));
        }
        let row = Trip {
            id: *trip.id(),
            owner_id: *trip.owner_id(),
            name: trip.name().to_owned(),
            join_code: trip.join_code().clone(),
            created_at: self.clock.utc(),
        };
        state.trips.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_join_code(
        &self,
        trip_id: &TripId,
        join_code: &JoinCode,
    ) -> Result<Option<Trip>, TripStoreError> {
        let mut state = self.lock()?;
        Ok(state.trips.get_mut(trip_id).map(|trip| {
            trip.join_code = join_code.clone();
            trip.clone()
        }))
    }

    async fn list_attendees(&self, trip_id: &TripId) -> Result<Vec<Attendee>, TripStoreError> {
        let state = self.lock()?;
        let mut rows: Vec<Attendee> = state
            .attendees
            .values()
            .filter(|row| row.trip_id == *trip_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });
        Ok(rows)
    }
}
