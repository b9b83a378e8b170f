//! Trip aggregate and its invitation secret.
//!
//! A trip carries exactly one valid [`JoinCode`] at a time. Rotating the code
//! replaces it; anyone holding the previous value can no longer join, while
//! existing attendees keep their membership.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum accepted join code length in bytes.
pub const JOIN_CODE_MAX_LEN: usize = 64;
/// Length of generated join codes.
pub const GENERATED_JOIN_CODE_LEN: usize = 6;
/// Maximum trip name length in characters.
pub const TRIP_NAME_MAX: usize = 120;

const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Validation errors for trip values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    /// Trip identifier was not a UUID.
    #[error("trip id must be a valid UUID")]
    InvalidId,
    /// Join code was empty.
    #[error("join code must not be empty")]
    EmptyJoinCode,
    /// Join code exceeded [`JOIN_CODE_MAX_LEN`].
    #[error("join code must be at most {max} bytes")]
    JoinCodeTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Trip name was empty after trimming.
    #[error("trip name must not be empty")]
    EmptyName,
    /// Trip name exceeded [`TRIP_NAME_MAX`].
    #[error("trip name must be at most {max} characters")]
    NameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Opaque trip identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripId(Uuid);

impl TripId {
    /// Parse a trip identifier from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TripValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| TripValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier for a new trip.
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

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TripId> for String {
    fn from(value: TripId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for TripId {
    type Error = TripValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The invitation secret currently accepted by a trip.
///
/// Comparison is byte-exact and case-sensitive; no normalisation is applied
/// on construction or comparison. The type deliberately has no `Display`
/// implementation and a redacted `Debug` so it cannot end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct JoinCode(String);

impl JoinCode {
    /// Accept a code exactly as given.
    pub fn new(raw: impl Into<String>) -> Result<Self, TripValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(TripValidationError::EmptyJoinCode);
        }
        if raw.len() > JOIN_CODE_MAX_LEN {
            return Err(TripValidationError::JoinCodeTooLong {
                max: JOIN_CODE_MAX_LEN,
            });
        }
        Ok(Self(raw))
    }

    /// Generate a random code of [`GENERATED_JOIN_CODE_LEN`] characters
    /// drawn from `A-Z0-9`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..GENERATED_JOIN_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..JOIN_CODE_ALPHABET.len());
                JOIN_CODE_ALPHABET.get(idx).copied().map_or('0', char::from)
            })
            .collect();
        Self(code)
    }

    /// Whether `presented` is exactly this code.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes() == presented.as_bytes()
    }

    /// Reveal the secret, for storage and for showing it to the trip owner.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JoinCode(<redacted>)")
    }
}

/// Validated trip name.
fn validate_name(name: String) -> Result<String, TripValidationError> {
    if name.trim().is_empty() {
        return Err(TripValidationError::EmptyName);
    }
    if name.chars().count() > TRIP_NAME_MAX {
        return Err(TripValidationError::NameTooLong {
            max: TRIP_NAME_MAX,
        });
    }
    Ok(name)
}

/// Persisted trip as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    /// Immutable identifier.
    pub id: TripId,
    /// User who created the trip and may rotate its code.
    pub owner_id: UserId,
    /// Display label.
    pub name: String,
    /// Currently valid invitation secret.
    pub join_code: JoinCode,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Whether `user_id` owns this trip.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id == *user_id
    }
}

/// Values required to create a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    id: TripId,
    owner_id: UserId,
    name: String,
    join_code: JoinCode,
}

impl NewTrip {
    /// Validate the name and assemble a creation request.
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        join_code: JoinCode,
    ) -> Result<Self, TripValidationError> {
        Ok(Self {
            id: TripId::random(),
            owner_id,
            name: validate_name(name.into())?,
            join_code,
        })
    }

    /// Identifier assigned to the new trip.
    pub fn id(&self) -> &TripId {
        &self.id
    }

    /// Owner of the new trip.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Display label.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Initial join code.
    pub fn join_code(&self) -> &JoinCode {
        &self.join_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    fn join_code_comparison_is_case_sensitive() {
        let code = JoinCode::new("ABC123").expect("valid code");
        assert!(code.matches("ABC123"));
        assert!(!code.matches("abc123"));
    }

    #[rstest]
    #[case(" ABC123")]
    #[case("ABC123 ")]
    #[case("ABC12")]
    #[case("")]
    fn join_code_comparison_does_not_normalise(#[case] presented: &str) {
        let code = JoinCode::new("ABC123").expect("valid code");
        assert!(!code.matches(presented));
    }

    #[rstest]
    fn join_code_rejects_empty_and_oversized_values() {
        assert_eq!(JoinCode::new(""), Err(TripValidationError::EmptyJoinCode));
        assert_eq!(
            JoinCode::new("x".repeat(JOIN_CODE_MAX_LEN + 1)),
            Err(TripValidationError::JoinCodeTooLong {
                max: JOIN_CODE_MAX_LEN
            })
        );
    }

    #[rstest]
    fn join_code_debug_is_redacted() {
        let code = JoinCode::new("7F2KQ9").expect("valid code");
        let rendered = format!("{code:?}");
        assert!(!rendered.contains("7F2KQ9"));
    }

    #[rstest]
    fn generated_codes_use_the_expected_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let code = JoinCode::generate(&mut rng);
            assert_eq!(code.expose().len(), GENERATED_JOIN_CODE_LEN);
            assert!(
                code.expose()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[rstest]
    #[case("", TripValidationError::EmptyName)]
    #[case("   ", TripValidationError::EmptyName)]
    fn new_trip_rejects_blank_names(#[case] name: &str, #[case] expected: TripValidationError) {
        let code = JoinCode::new("ABC123").expect("valid code");
        assert_eq!(NewTrip::new(UserId::random(), name, code), Err(expected));
    }

    #[rstest]
    fn trip_id_rejects_non_uuid() {
        assert_eq!(TripId::new("T1"), Err(TripValidationError::InvalidId));
    }
}
