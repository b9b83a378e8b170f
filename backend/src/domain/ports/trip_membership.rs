//! Driving ports for trip membership.
//!
//! HTTP handlers depend on these traits rather than on the concrete service,
//! which keeps the inbound adapter free of outbound generics.

use async_trait::async_trait;

use crate::domain::{Attendee, Error, JoinOutcome, Trip, TripId};

use super::CallerIdentity;

/// Commands that change trip membership or trip secrets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripMembershipCommand: Send + Sync {
    /// Admit the caller to `trip_id` when `presented_code` matches.
    async fn join(
        &self,
        trip_id: TripId,
        presented_code: String,
        caller: CallerIdentity,
    ) -> JoinOutcome;

    /// Create a trip owned by the caller with a freshly generated code.
    async fn create_trip(&self, caller: CallerIdentity, name: String) -> Result<Trip, Error>;

    /// Replace the trip's join code. Only the owner may rotate.
    async fn rotate_join_code(&self, caller: CallerIdentity, trip_id: TripId)
    -> Result<Trip, Error>;
}

/// Read-side membership queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripMembershipQuery: Send + Sync {
    /// List attendees of `trip_id`, visible to its owner and attendees.
    async fn list_attendees(
        &self,
        caller: CallerIdentity,
        trip_id: TripId,
    ) -> Result<Vec<Attendee>, Error>;
}
