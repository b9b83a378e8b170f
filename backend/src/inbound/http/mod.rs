//! HTTP inbound adapter exposing the trip membership REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;

pub use error::ApiResult;
