//! In-process adapters used when no database is configured and in tests.
//!
//! They honour the same port contracts as the Diesel adapters, including
//! exactly-once attendee insertion under concurrent calls.

mod in_memory_identity_provider;
mod in_memory_trip_store;

pub use in_memory_identity_provider::InMemoryIdentityProvider;
pub use in_memory_trip_store::InMemoryTripStore;
