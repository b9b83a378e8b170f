//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters translate between Diesel rows and domain types and map driver
//! failures onto port errors. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use trips_backend::outbound::persistence::{DbPool, DieselTripStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/trips")).await?;
//! let store = DieselTripStore::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_identity_provider;
mod diesel_trip_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_identity_provider::DieselIdentityProvider;
pub use diesel_trip_store::DieselTripStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
