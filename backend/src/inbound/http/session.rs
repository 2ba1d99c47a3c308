//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting the signed-in reader or the
//! chosen interface language.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, ErrorCode, Locale, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const LANGUAGE_KEY: &str = "language";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id and rotate the session cookie.
    ///
    /// Renewal stops a cookie issued before login from being promoted into an
    /// authenticated session.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Store the interface language for later requests.
    pub fn persist_language(&self, language: Locale) -> Result<(), Error> {
        self.0
            .insert(LANGUAGE_KEY, language.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Language stored in the session; unreadable values are ignored.
    pub fn language(&self) -> Option<Locale> {
        match self.0.get::<String>(LANGUAGE_KEY) {
            Ok(Some(raw)) => raw.parse().ok(),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!("unreadable language in session cookie: {error}");
                None
            }
        }
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Purge the session when `result` is `401 Unauthorized`.
    ///
    /// Used by handlers that load the caller's own profile, so a session
    /// outliving its account is cleared rather than retried.
    pub fn expire_on_unauthorized<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if matches!(&result, Err(err) if err.code() == ErrorCode::Unauthorized) {
            self.purge();
        }
        result
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

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::inbound::http::test_utils::session_cookie;

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                        .expect("fixture id");
                    session.persist_user(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let id = session.require_user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                }),
            )
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(session_test_app()).await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorised() {
        let app = test::init_service(session_test_app()).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/set-invalid",
            web::get().to(|session: Session| async move {
                session
                    .insert(USER_ID_KEY, "not-a-uuid")
                    .expect("set invalid user id");
                HttpResponse::Ok()
            }),
        ))
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn language_round_trips_and_ignores_unknown_tags() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/lang/{tag}",
                    web::get().to(|session: Session, tag: web::Path<String>| async move {
                        session
                            .insert(LANGUAGE_KEY, tag.into_inner())
                            .expect("set language");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/lang",
                    web::get().to(|session: SessionContext| async move {
                        let label = session.language().map_or("none", Locale::as_str);
                        HttpResponse::Ok().body(label)
                    }),
                ),
        )
        .await;

        for (tag, expected) in [("en", "en"), ("de", "none")] {
            let set_res = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri(&format!("/lang/{tag}"))
                    .to_request(),
            )
            .await;
            let cookie = session_cookie(&set_res);
            let res = test::call_service(
                &app,
                test::TestRequest::get().uri("/lang").cookie(cookie).to_request(),
            )
            .await;
            assert_eq!(test::read_body(res).await, expected);
        }
    }

    #[actix_web::test]
    async fn purge_expires_the_session() {
        let app = test::init_service(session_test_app().route(
            "/purge",
            web::get().to(|session: SessionContext| async move {
                session.purge();
                HttpResponse::Ok()
            }),
        ))
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let purge_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/purge")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = purge_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie issued");
        assert_eq!(removal.value(), "");
    }
}
