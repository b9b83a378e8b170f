//! Test helpers for inbound HTTP components.

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, HttpResponse, test, web};

use crate::domain::{Error as DomainError, UserId};
use crate::inbound::http::session::USER_ID_KEY;

/// Path of the test-only route that signs a user in.
pub const TEST_LOGIN_PATH: &str = "/test/login/{user_id}";

/// Session middleware with a fresh key, cookie name `session`, and the
/// `Secure` flag off for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Write `user_id` into the session the way the identity provider does.
async fn test_login(
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| DomainError::invalid_request(err.to_string()))?;
    session
        .insert(USER_ID_KEY, user_id.to_string())
        .map_err(|err| DomainError::internal(format!("failed to persist session: {err}")))?;
    Ok(HttpResponse::NoContent().finish())
}

/// App with session middleware and the test login route, standing in for
/// the external identity provider.
pub fn session_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .route(TEST_LOGIN_PATH, web::post().to(test_login))
}

/// Sign `user_id` in through the test login route and return the cookie.
pub async fn login_cookie<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
