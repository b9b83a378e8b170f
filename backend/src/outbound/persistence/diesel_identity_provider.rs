//! Identity provider backed by the `users` table.
//!
//! The session carries only a user id. This adapter looks the user up and
//! returns the profile fields that are snapshotted onto attendee rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CallerIdentity, IdentityError, IdentityProvider};
use crate::domain::{UserId, UserProfile};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`IdentityProvider`] port.
#[derive(Clone)]
pub struct DieselIdentityProvider {
    pool: DbPool,
}

impl DieselIdentityProvider {
    /// Create a provider over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: UserRow) -> Result<UserProfile, IdentityError> {
    UserProfile::new(UserId::from_uuid(row.id), row.display_name, row.avatar_url)
        .map_err(|err| IdentityError::backend(format!("invalid user record: {err}")))
}

#[async_trait]
impl IdentityProvider for DieselIdentityProvider {
    async fn resolve(&self, caller: &CallerIdentity) -> Result<UserProfile, IdentityError> {
        let user_id = caller.user_id().ok_or_else(IdentityError::unauthenticated)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityError::backend))?;

        let row: Option<UserRow> = users::table
            .find(*user_id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, IdentityError::backend, IdentityError::backend))?;

        match row {
            Some(row) => row_to_profile(row),
            None => Err(IdentityError::unknown_user(user_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn rows_become_profiles() {
        let id = Uuid::new_v4();
        let profile = row_to_profile(UserRow {
            id,
            display_name: "Uma".to_owned(),
            avatar_url: Some("https://img.example/u.png".to_owned()),
        })
        .expect("valid row");

        assert_eq!(profile.user_id().as_uuid(), &id);
        assert_eq!(profile.avatar_url(), Some("https://img.example/u.png"));
    }

    #[rstest]
    fn blank_display_name_is_a_backend_error() {
        let err = row_to_profile(UserRow {
            id: Uuid::new_v4(),
            display_name: " ".to_owned(),
            avatar_url: None,
        })
        .expect_err("invalid row");

        assert!(matches!(err, IdentityError::Backend { .. }));
    }
}
