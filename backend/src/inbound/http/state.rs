//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on the driving
//! ports, so tests can substitute any implementation.

use std::sync::Arc;

use crate::domain::ports::{TripMembershipCommand, TripMembershipQuery};

/// Port bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Join, create, and rotate operations.
    pub membership: Arc<dyn TripMembershipCommand>,
    /// Attendee listing.
    pub membership_query: Arc<dyn TripMembershipQuery>,
}

impl HttpState {
    /// Bundle the membership ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use trips_backend::domain::TripMembershipService;
    /// use trips_backend::inbound::http::state::HttpState;
    /// use trips_backend::outbound::memory::{InMemoryIdentityProvider, InMemoryTripStore};
    ///
    /// let service = Arc::new(TripMembershipService::new(
    ///     Arc::new(InMemoryTripStore::default()),
    ///     Arc::new(InMemoryIdentityProvider::new()),
    /// ));
    /// let _state = HttpState::new(service.clone(), service);
    /// ```
    pub fn new(
        membership: Arc<dyn TripMembershipCommand>,
        membership_query: Arc<dyn TripMembershipQuery>,
    ) -> Self {
        Self {
            membership,
            membership_query,
        }
    }
}
