//! Trip membership backend.
//!
//! Users join trips by presenting the trip's join code. The crate is laid
//! out hexagonally: [`domain`] holds the rules and ports, [`inbound`] the
//! HTTP adapter, and [`outbound`] the Diesel, in-memory, and metrics
//! adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
