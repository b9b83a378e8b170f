//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod join_metrics;
mod trip_membership;
mod trip_store;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{CallerIdentity, IdentityError, IdentityProvider};
#[cfg(test)]
pub use join_metrics::MockJoinMetrics;
pub use join_metrics::{JoinMetrics, JoinMetricsError, NoOpJoinMetrics};
#[cfg(test)]
pub use trip_membership::{MockTripMembershipCommand, MockTripMembershipQuery};
pub use trip_membership::{TripMembershipCommand, TripMembershipQuery};
#[cfg(test)]
pub use trip_store::MockTripStore;
pub use trip_store::{InsertAttendeeOutcome, TripStore, TripStoreError};
