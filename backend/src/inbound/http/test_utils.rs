//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{App, test as actix_test, web};

use crate::domain::ports::{FIXTURE_EMAIL, FIXTURE_PASSWORD};
use crate::inbound::http::accounts::login;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Wrap ports in the shared state handlers expect.
pub fn state_with(ports: HttpStatePorts) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports))
}

/// Fixture-backed state.
pub fn fixture_state() -> web::Data<HttpState> {
    state_with(HttpStatePorts::fixtures())
}

/// App with session middleware, the given state and `configure`d routes
/// mounted under `/api/v1` next to the login handler.
pub fn test_app<F>(
    state: web::Data<HttpState>,
    configure: F,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(state)
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").service(login).configure(configure))
}

/// Log in as the fixture reader and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({
            "email": FIXTURE_EMAIL,
            "password": FIXTURE_PASSWORD,
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login succeeds");
    session_cookie(&response)
}
