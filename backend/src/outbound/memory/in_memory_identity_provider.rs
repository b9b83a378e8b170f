//! `IdentityProvider` backed by an in-process user directory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{CallerIdentity, IdentityError, IdentityProvider};
use crate::domain::{UserId, UserProfile};

/// In-memory user directory.
///
/// With auto-provisioning enabled, unknown session users are given a
/// placeholder profile instead of being rejected. The server enables it when
/// running without a database.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    auto_provision: bool,
}

impl InMemoryIdentityProvider {
    /// Directory that rejects users it does not know.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that invents a profile for any authenticated caller.
    pub fn auto_provisioning() -> Self {
        Self {
            profiles: RwLock::default(),
            auto_provision: true,
        }
    }

    /// Register or replace a profile.
    pub fn insert(&self, profile: UserProfile) -> Result<(), IdentityError> {
        self.profiles
            .write()
            .map_err(|_| IdentityError::backend("identity directory lock poisoned"))?
            .insert(*profile.user_id(), profile);
        Ok(())
    }

    fn placeholder(user_id: &UserId) -> Result<UserProfile, IdentityError> {
        let short: String = user_id.to_string().chars().take(8).collect();
        UserProfile::new(*user_id, format!("Traveller {short}"), None)
            .map_err(|err| IdentityError::backend(err.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn resolve(&self, caller: &CallerIdentity) -> Result<UserProfile, IdentityError> {
        let user_id = caller.user_id().ok_or_else(IdentityError::unauthenticated)?;
        let known = self
            .profiles
            .read()
            .map_err(|_| IdentityError::backend("identity directory lock poisoned"))?
            .get(user_id)
            .cloned();
        match known {
            Some(profile) => Ok(profile),
            None if self.auto_provision => {
                let profile = Self::placeholder(user_id)?;
                self.insert(profile.clone())?;
                Ok(profile)
            }
            None => Err(IdentityError::unknown_user(user_id.to_string())),
        }
    }
}
