//! Trip attendee records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TripId, UserId, UserProfile};

/// A user's membership of a trip, unique per `(trip_id, user_id)`.
///
/// `name` and `avatar_url` are a snapshot of the caller's profile taken at
/// join time and are not kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Trip the user joined.
    pub trip_id: TripId,
    /// The joining user.
    pub user_id: UserId,
    /// Display name at join time.
    pub name: String,
    /// Avatar URL at join time.
    pub avatar_url: Option<String>,
    /// When the row was created.
    pub joined_at: DateTime<Utc>,
}

/// Insert request for an attendee row; the store assigns `joined_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendee {
    /// Trip being joined.
    pub trip_id: TripId,
    /// Joining user.
    pub user_id: UserId,
    /// Display name snapshot.
    pub name: String,
    /// Avatar URL snapshot.
    pub avatar_url: Option<String>,
}

impl NewAttendee {
    /// Snapshot `profile` as a pending membership of `trip_id`.
    #[must_use]
    pub fn from_profile(trip_id: TripId, profile: &UserProfile) -> Self {
        Self {
            trip_id,
            user_id: *profile.user_id(),
            name: profile.display_name().to_owned(),
            avatar_url: profile.avatar_url().map(str::to_owned),
        }
    }

    /// Materialise the stored row with the supplied timestamp.
    #[must_use]
    pub fn into_attendee(self, joined_at: DateTime<Utc>) -> Attendee {
        Attendee {
            trip_id: self.trip_id,
            user_id: self.user_id,
            name: self.name,
            avatar_url: self.avatar_url,
            joined_at,
        }
    }
}
