//! Domain primitives, services, and ports.
//!
//! Purpose: hold the trip membership rules independent of HTTP and storage.
//! Adapters in `inbound` and `outbound` depend on this module; nothing here
//! depends on them.
//!
//! Public surface:
//! - [`TripMembershipService`]: join, create, rotate, and list operations.
//! - [`JoinOutcome`]: the typed result of a join attempt.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.
//! - [`ports`]: driven and driving port traits.

pub mod attendee;
pub mod error;
mod join_outcome;
mod membership_service;
pub mod ports;
pub mod trace_id;
pub mod trip;
pub mod user;

pub use self::attendee::{Attendee, NewAttendee};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::join_outcome::{
    CODE_MISMATCH_MESSAGE, IDENTITY_UNAVAILABLE_MESSAGE, JoinOutcome, JoinOutcomeKind, Membership,
    TRIP_NOT_FOUND_MESSAGE,
};
pub use self::membership_service::TripMembershipService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip::{
    GENERATED_JOIN_CODE_LEN, JOIN_CODE_MAX_LEN, JoinCode, NewTrip, TRIP_NAME_MAX, Trip, TripId,
    TripValidationError,
};
pub use self::user::{UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use trips_backend::domain::{ApiResult, Error};
///
/// fn guard(is_owner: bool) -> ApiResult<()> {
///     if is_owner {
///         Ok(())
///     } else {
///         Err(Error::forbidden("only the trip owner may do that"))
///     }
/// }
///
/// assert!(guard(false).is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
