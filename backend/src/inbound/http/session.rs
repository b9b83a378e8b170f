//! Session access for HTTP handlers.
//!
//! The identity provider signs users in and writes their id into the shared
//! cookie session. Handlers here only read it back and turn it into a
//! [`CallerIdentity`]; this service never issues sessions itself.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::CallerIdentity;
use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Wrapper exposing the session as domain values.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// The session's user id, if present and well formed.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// Identity claimed by this request.
    ///
    /// Unreadable sessions are treated as anonymous; the identity provider
    /// decides what an anonymous caller may do.
    pub fn caller(&self) -> CallerIdentity {
        match self.user_id() {
            Ok(user_id) => CallerIdentity::from(user_id),
            Err(error) => {
                warn!(error = %error.message(), "session unreadable; treating caller as anonymous");
                CallerIdentity::anonymous()
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
