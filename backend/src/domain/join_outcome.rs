//! Result of a join attempt.
//!
//! Every call to the membership service yields exactly one [`JoinOutcome`].
//! Failures are values, not `Err`, so callers must handle each case
//! explicitly. [`JoinOutcome::into_result`] maps the outcome onto the
//! transport-agnostic [`Error`] for adapters that need one.

use std::fmt;

use serde_json::json;
use tracing::{error, warn};

use super::ports::TripStoreError;
use super::{Attendee, Error, TripId};

/// Message for an unknown trip. Kept distinct from the mismatch message so
/// users know whether to re-check the trip link or the code.
pub const TRIP_NOT_FOUND_MESSAGE: &str = "trip not found; check the trip link";
/// Message for a wrong code.
pub const CODE_MISMATCH_MESSAGE: &str = "join code does not match this trip";
/// Message when the caller could not be identified.
pub const IDENTITY_UNAVAILABLE_MESSAGE: &str = "sign in again to join this trip";
/// Message when the trip store cannot be reached. Driver detail stays in logs.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "trip store unavailable; retry shortly";

/// Outcome of [`crate::domain::TripMembershipService::validate_and_join`].
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// No trip exists with the requested id.
    TripNotFound,
    /// The presented code differs from the trip's current code.
    CodeMismatch,
    /// The caller's identity could not be resolved.
    IdentityUnavailable,
    /// A new attendee row was created.
    Joined(Attendee),
    /// The caller was already an attendee; nothing changed.
    AlreadyJoined,
    /// The store failed; retrying is safe.
    StoreError(TripStoreError),
}

/// Label-only view of [`JoinOutcome`] for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinOutcomeKind {
    /// See [`JoinOutcome::TripNotFound`].
    TripNotFound,
    /// See [`JoinOutcome::CodeMismatch`].
    CodeMismatch,
    /// See [`JoinOutcome::IdentityUnavailable`].
    IdentityUnavailable,
    /// See [`JoinOutcome::Joined`].
    Joined,
    /// See [`JoinOutcome::AlreadyJoined`].
    AlreadyJoined,
    /// See [`JoinOutcome::StoreError`].
    StoreError,
}

impl JoinOutcomeKind {
    /// Stable snake_case label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TripNotFound => "trip_not_found",
            Self::CodeMismatch => "code_mismatch",
            Self::IdentityUnavailable => "identity_unavailable",
            Self::Joined => "joined",
            Self::AlreadyJoined => "already_joined",
            Self::StoreError => "store_error",
        }
    }
}

impl fmt::Display for JoinOutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful membership, as seen by navigation logic.
///
/// `Joined` and `AlreadyJoined` both send the caller to the trip; only
/// `attendee` differs.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    /// Trip the caller belongs to.
    pub trip_id: TripId,
    /// The new row when this call created it; `None` for a repeat join.
    pub attendee: Option<Attendee>,
}

impl Membership {
    /// Path of the trip detail view the caller should be sent to.
    #[must_use]
    pub fn redirect_path(&self) -> String {
        format!("/trips/{}", self.trip_id)
    }

    /// Whether this call created the membership.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.attendee.is_some()
    }
}

impl JoinOutcome {
    /// Telemetry label for this outcome.
    #[must_use]
    pub fn kind(&self) -> JoinOutcomeKind {
        match self {
            Self::TripNotFound => JoinOutcomeKind::TripNotFound,
            Self::CodeMismatch => JoinOutcomeKind::CodeMismatch,
            Self::IdentityUnavailable => JoinOutcomeKind::IdentityUnavailable,
            Self::Joined(_) => JoinOutcomeKind::Joined,
            Self::AlreadyJoined => JoinOutcomeKind::AlreadyJoined,
            Self::StoreError(_) => JoinOutcomeKind::StoreError,
        }
    }

    /// `true` for `Joined` and `AlreadyJoined`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Joined(_) | Self::AlreadyJoined)
    }

    /// Convert into a membership or a domain error for `trip_id`.
    ///
    /// # Examples
    /// ```
    /// use trips_backend::domain::{ErrorCode, JoinOutcome, TripId};
    ///
    /// let trip_id = TripId::random();
    /// let membership = JoinOutcome::AlreadyJoined.into_result(trip_id).expect("success");
    /// assert!(!membership.is_new());
    ///
    /// let err = JoinOutcome::CodeMismatch.into_result(trip_id).expect_err("failure");
    /// assert_eq!(err.code(), ErrorCode::InvalidRequest);
    /// ```
    pub fn into_result(self, trip_id: TripId) -> Result<Membership, Error> {
        match self {
            Self::Joined(attendee) => Ok(Membership {
                trip_id,
                attendee: Some(attendee),
            }),
            Self::AlreadyJoined => Ok(Membership {
                trip_id,
                attendee: None,
            }),
            Self::TripNotFound => Err(Error::not_found(TRIP_NOT_FOUND_MESSAGE).with_details(
                json!({ "tripId": trip_id.to_string(), "code": "trip_not_found" }),
            )),
            Self::CodeMismatch => Err(Error::invalid_request(CODE_MISMATCH_MESSAGE)
                .with_details(json!({ "field": "code", "code": "join_code_mismatch" }))),
            Self::IdentityUnavailable => Err(Error::unauthorized(IDENTITY_UNAVAILABLE_MESSAGE)),
            Self::StoreError(cause) => Err(map_store_error(cause)),
        }
    }
}

/// Map store failures onto retry-friendly domain errors.
pub(crate) fn map_store_error(error: TripStoreError) -> Error {
    match error {
        TripStoreError::Connection { message } => {
            warn!(cause = %message, "trip store unavailable");
            Error::service_unavailable(STORE_UNAVAILABLE_MESSAGE)
        }
        TripStoreError::Query { message } => {
            error!(cause = %message, "trip store query failed");
            Error::internal("trip store error")
        }
    }
}
