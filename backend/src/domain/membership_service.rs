//! Trip membership domain service.
//!
//! Admits users to trips on presentation of the trip's current join code and
//! implements the owner-side operations around that code. The service holds
//! no locks: exactly-once admission relies on the store's uniqueness
//! guarantee for `(trip_id, user_id)`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::join_outcome::map_store_error;
use crate::domain::ports::{
    CallerIdentity, IdentityError, IdentityProvider, InsertAttendeeOutcome, JoinMetrics,
    NoOpJoinMetrics, TripMembershipCommand, TripMembershipQuery, TripStore,
};
use crate::domain::{
    Attendee, Error, JoinCode, JoinOutcome, NewAttendee, NewTrip, Trip, TripId, UserProfile,
};

/// Trip membership service implementing the membership driving ports.
#[derive(Clone)]
pub struct TripMembershipService<S, I, M = NoOpJoinMetrics> {
    store: Arc<S>,
    identity: Arc<I>,
    metrics: Arc<M>,
}

impl<S, I> TripMembershipService<S, I, NoOpJoinMetrics> {
    /// Create a service that discards join metrics.
    pub fn new(store: Arc<S>, identity: Arc<I>) -> Self {
        Self {
            store,
            identity,
            metrics: Arc::new(NoOpJoinMetrics),
        }
    }
}

impl<S, I, M> TripMembershipService<S, I, M> {
    /// Replace the metrics sink.
    pub fn with_metrics<N>(self, metrics: Arc<N>) -> TripMembershipService<S, I, N> {
        TripMembershipService {
            store: self.store,
            identity: self.identity,
            metrics,
        }
    }
}

impl<S, I, M> TripMembershipService<S, I, M>
where
    S: TripStore,
    I: IdentityProvider,
    M: JoinMetrics,
{
    /// Admit the caller to `trip_id` if `presented_code` matches the trip's
    /// current join code.
    ///
    /// Identity is resolved first; on failure the store is never touched.
    /// The code comparison is byte-exact. A caller who is already an
    /// attendee gets [`JoinOutcome::AlreadyJoined`] and no row is written.
    /// This method never returns `Err` and never panics; every failure is a
    /// [`JoinOutcome`] variant.
    pub async fn validate_and_join(
        &self,
        trip_id: TripId,
        presented_code: &str,
        caller: &CallerIdentity,
    ) -> JoinOutcome {
        let outcome = self.admit(trip_id, presented_code, caller).await;
        let kind = outcome.kind();
        match &outcome {
            JoinOutcome::StoreError(cause) => {
                warn!(%trip_id, outcome = %kind, error = %cause, "trip join failed");
            }
            _ => info!(%trip_id, outcome = %kind, "trip join attempt"),
        }
        if let Err(err) = self.metrics.record(kind).await {
            warn!(error = %err, "failed to record join metrics");
        }
        outcome
    }

    async fn admit(
        &self,
        trip_id: TripId,
        presented_code: &str,
        caller: &CallerIdentity,
    ) -> JoinOutcome {
        let profile = match self.identity.resolve(caller).await {
            Ok(profile) => profile,
            Err(err) => {
                debug!(%trip_id, error = %err, "identity unavailable for join");
                return JoinOutcome::IdentityUnavailable;
            }
        };

        let trip = match self.store.get_trip_by_id(&trip_id).await {
            Ok(Some(trip)) => trip,
            Ok(None) => return JoinOutcome::TripNotFound,
            Err(cause) => return JoinOutcome::StoreError(cause),
        };

        if !trip.join_code.matches(presented_code) {
            return JoinOutcome::CodeMismatch;
        }

        let attendee = NewAttendee::from_profile(trip.id, &profile);
        match self.store.insert_attendee_if_absent(&attendee).await {
            Ok(InsertAttendeeOutcome::Inserted(row)) => {
                debug!(%trip_id, user_id = %row.user_id, "attendee inserted");
                JoinOutcome::Joined(row)
            }
            Ok(InsertAttendeeOutcome::ConflictAlreadyExists) => JoinOutcome::AlreadyJoined,
            Err(cause) => JoinOutcome::StoreError(cause),
        }
    }

    async fn resolve_caller(&self, caller: &CallerIdentity) -> Result<UserProfile, Error> {
        self.identity
            .resolve(caller)
            .await
            .map_err(map_identity_error)
    }

    async fn load_trip(&self, trip_id: &TripId) -> Result<Trip, Error> {
        self.store
            .get_trip_by_id(trip_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(trip_not_found)
    }

    /// Create a trip owned by the caller with a freshly generated join code.
    pub async fn create_trip(&self, caller: &CallerIdentity, name: String) -> Result<Trip, Error> {
        let owner = self.resolve_caller(caller).await?;
        let join_code = JoinCode::generate(&mut rand::thread_rng());
        let new_trip = NewTrip::new(*owner.user_id(), name, join_code)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let trip = self
            .store
            .create_trip(&new_trip)
            .await
            .map_err(map_store_error)?;
        info!(trip_id = %trip.id, owner_id = %trip.owner_id, "trip created");
        Ok(trip)
    }

    /// Replace the trip's join code with a newly generated one.
    ///
    /// Only the owner may rotate. Existing attendees keep their membership;
    /// the previous code stops matching immediately.
    pub async fn rotate_join_code(
        &self,
        caller: &CallerIdentity,
        trip_id: TripId,
    ) -> Result<Trip, Error> {
        let profile = self.resolve_caller(caller).await?;
        let trip = self.load_trip(&trip_id).await?;
        if !trip.is_owned_by(profile.user_id()) {
            return Err(Error::forbidden("only the trip owner can rotate the join code"));
        }

        let join_code = JoinCode::generate(&mut rand::thread_rng());
        let rotated = self
            .store
            .update_join_code(&trip_id, &join_code)
            .await
            .map_err(map_store_error)?
            .ok_or_else(trip_not_found)?;
        info!(%trip_id, "join code rotated");
        Ok(rotated)
    }

    /// List a trip's attendees for its owner or one of its attendees.
    pub async fn list_attendees(
        &self,
        caller: &CallerIdentity,
        trip_id: TripId,
    ) -> Result<Vec<Attendee>, Error> {
        let profile = self.resolve_caller(caller).await?;
        let trip = self.load_trip(&trip_id).await?;
        let attendees = self
            .store
            .list_attendees(&trip_id)
            .await
            .map_err(map_store_error)?;

        let user_id = profile.user_id();
        let visible =
            trip.is_owned_by(user_id) || attendees.iter().any(|row| row.user_id == *user_id);
        if !visible {
            return Err(Error::forbidden("only trip members can view attendees"));
        }
        Ok(attendees)
    }
}

fn trip_not_found() -> Error {
    Error::not_found(crate::domain::join_outcome::TRIP_NOT_FOUND_MESSAGE)
}

fn map_identity_error(error: IdentityError) -> Error {
    match error {
        IdentityError::Unauthenticated => Error::unauthorized("login required"),
        IdentityError::UnknownUser { .. } => Error::unauthorized("session user is not known"),
        IdentityError::Backend { message } => {
            warn!(cause = %message, "identity provider unavailable");
            Error::service_unavailable("identity provider unavailable; retry shortly")
        }
    }
}

#[async_trait]
impl<S, I, M> TripMembershipCommand for TripMembershipService<S, I, M>
where
    S: TripStore,
    I: IdentityProvider,
    M: JoinMetrics,
{
    async fn join(
        &self,
        trip_id: TripId,
        presented_code: String,
        caller: CallerIdentity,
    ) -> JoinOutcome {
        self.validate_and_join(trip_id, &presented_code, &caller)
            .await
    }

    async fn create_trip(&self, caller: CallerIdentity, name: String) -> Result<Trip, Error> {
        TripMembershipService::create_trip(self, &caller, name).await
    }

    async fn rotate_join_code(
        &self,
        caller: CallerIdentity,
        trip_id: TripId,
    ) -> Result<Trip, Error> {
        TripMembershipService::rotate_join_code(self, &caller, trip_id).await
    }
}

#[async_trait]
impl<S, I, M> TripMembershipQuery for TripMembershipService<S, I, M>
where
    S: TripStore,
    I: IdentityProvider,
    M: JoinMetrics,
{
    async fn list_attendees(
        &self,
        caller: CallerIdentity,
        trip_id: TripId,
    ) -> Result<Vec<Attendee>, Error> {
        TripMembershipService::list_attendees(self, &caller, trip_id).await
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
