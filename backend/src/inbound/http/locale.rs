//! Request language extractor.
//!
//! Resolution order: the language stored in the session, then the first
//! supported tag in `Accept-Language`, then Turkish.

use actix_session::SessionExt;
use actix_web::http::header::{AcceptLanguage, Header, Preference, Quality};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::Locale;
use crate::inbound::http::session::SessionContext;

/// Interface language for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    pub fn get(self) -> Locale {
        self.0
    }

    fn resolve(req: &HttpRequest) -> Self {
        let from_session = SessionContext::new(req.get_session()).language();
        Self(
            from_session
                .or_else(|| accepted_locale(req))
                .unwrap_or_default(),
        )
    }
}

/// Highest-ranked supported language in `Accept-Language`.
///
/// Tags weighted `q=0` are refused by the client and never chosen.
fn accepted_locale(req: &HttpRequest) -> Option<Locale> {
    let AcceptLanguage(items) = AcceptLanguage::parse(req).ok()?;
    let acceptable = items
        .into_iter()
        .filter(|item| item.quality > Quality::ZERO)
        .collect();
    AcceptLanguage(acceptable)
        .ranked()
        .into_iter()
        .find_map(|preference| match preference {
            Preference::Specific(tag) => tag.primary_language().parse().ok(),
            Preference::Any => None,
        })
}

impl FromRequest for RequestLocale {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::resolve(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::header::ACCEPT_LANGUAGE;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::session::LANGUAGE_KEY;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    async fn echo(locale: RequestLocale) -> HttpResponse {
        HttpResponse::Ok().body(locale.get().as_str())
    }

    #[rstest]
    #[case(None, "tr")]
    #[case(Some("en-US,en;q=0.9"), "en")]
    #[case(Some("fr-FR, de;q=0.8"), "tr")]
    #[case(Some("tr;q=0.4, en;q=0.9"), "en")]
    #[case(Some("en;q=0, tr-TR;q=0.2"), "tr")]
    #[case(Some("de, en-GB;q=0.7, tr;q=0.5"), "en")]
    #[case(Some("*"), "tr")]
    #[actix_web::test]
    async fn falls_back_from_header_to_turkish(
        #[case] header: Option<&str>,
        #[case] expected: &str,
    ) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/locale", web::get().to(echo)),
        )
        .await;
        let mut request = test::TestRequest::get().uri("/locale");
        if let Some(value) = header {
            request = request.insert_header((ACCEPT_LANGUAGE, value));
        }
        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(test::read_body(res).await, expected);
    }

    #[actix_web::test]
    async fn session_language_beats_the_header() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: Session| async move {
                        session.insert(LANGUAGE_KEY, "en").expect("store language");
                        HttpResponse::Ok()
                    }),
                )
                .route("/locale", web::get().to(echo)),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/locale")
                .cookie(session_cookie(&set_res))
                .insert_header((ACCEPT_LANGUAGE, "tr-TR"))
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "en");
    }
}
