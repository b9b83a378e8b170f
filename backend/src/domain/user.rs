//! Caller identity and profile snapshot types.
//!
//! The identity provider owns user accounts. This service only ever sees a
//! stable [`UserId`] and the profile fields copied onto an attendee row when
//! a user joins a trip.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by user identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Display name was empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Stable user identifier issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID, typically read back from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile fields resolved for the caller at request time.
///
/// `display_name` and `avatar_url` are copied onto the attendee row when the
/// caller joins; later profile edits do not propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    user_id: UserId,
    display_name: String,
    avatar_url: Option<String>,
}

impl UserProfile {
    /// Construct a profile, rejecting blank display names.
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        Ok(Self {
            user_id,
            display_name,
            avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
        })
    }

    /// Identifier of the user this profile belongs to.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Name shown to other attendees.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Avatar image URL, if the user has one.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_round_trips_through_serde() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
        let parsed: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn profile_rejects_blank_names() {
        let result = UserProfile::new(UserId::random(), "  ", None);
        assert_eq!(result, Err(UserValidationError::EmptyDisplayName));
    }

    #[rstest]
    fn profile_drops_blank_avatar_urls() {
        let profile =
            UserProfile::new(UserId::random(), "Ada", Some(" ".to_owned())).expect("valid profile");
        assert!(profile.avatar_url().is_none());
    }
}
