//! Driven port resolving the caller into a user profile.

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving the caller's identity.
    pub enum IdentityError {
        /// The request carried no authenticated user.
        Unauthenticated => "caller is not authenticated",
        /// The session names a user the provider does not know.
        UnknownUser { user_id: String } => "user {user_id} is not known to the identity provider",
        /// The provider itself failed.
        Backend { message: String } => "identity provider failed: {message}",
    }
}

/// Identity claimed by the caller of a request.
///
/// Built by inbound adapters from whatever credential the transport carries;
/// for HTTP this is the `user_id` stored in the session cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallerIdentity(Option<UserId>);

impl CallerIdentity {
    /// A caller with no session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// A caller carrying a session for `user_id`.
    #[must_use]
    pub fn authenticated(user_id: UserId) -> Self {
        Self(Some(user_id))
    }

    /// The claimed user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

impl From<Option<UserId>> for CallerIdentity {
    fn from(value: Option<UserId>) -> Self {
        Self(value)
    }
}

/// Port yielding a stable user id and profile for a caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve `caller` into the profile snapshot used for attendee rows.
    async fn resolve(&self, caller: &CallerIdentity) -> Result<UserProfile, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn anonymous_caller_has_no_user() {
        assert!(CallerIdentity::anonymous().user_id().is_none());
        assert_eq!(CallerIdentity::default(), CallerIdentity::anonymous());
    }

    #[rstest]
    fn authenticated_caller_exposes_user() {
        let user_id = UserId::random();
        let caller = CallerIdentity::from(Some(user_id));
        assert_eq!(caller.user_id(), Some(&user_id));
    }

    #[rstest]
    fn unknown_user_error_names_the_user() {
        let err = IdentityError::unknown_user("abc");
        assert_eq!(
            err.to_string(),
            "user abc is not known to the identity provider"
        );
    }
}
