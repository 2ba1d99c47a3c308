//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{CatalogConfig, ServerConfig};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use shelfmate::Trace;
#[cfg(debug_assertions)]
use shelfmate::doc::ApiDoc;
use shelfmate::inbound::http::health::{HealthState, live, ready};
use shelfmate::inbound::http::state::HttpState;
use shelfmate::inbound::http::{
    accounts, admin, books, friends, library, notifications, profiles, recommendations,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Register every `/api/v1` handler.
///
/// Literal segments are registered before their `{id}` siblings so
/// `read-all` and `unread-count` never parse as identifiers.
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::signup)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_session)
        .service(accounts::set_language)
        .service(profiles::own_profile)
        .service(profiles::update_profile)
        .service(profiles::profile_summary)
        .service(profiles::public_profile)
        .service(profiles::search_users)
        .service(books::search_books)
        .service(books::get_book)
        .service(library::feed)
        .service(library::add_to_library)
        .service(library::list_library)
        .service(library::get_entry)
        .service(library::change_status)
        .service(library::review)
        .service(library::set_favorite)
        .service(friends::list_friends)
        .service(friends::incoming_requests)
        .service(friends::relationship_status)
        .service(friends::send_request)
        .service(friends::accept_request)
        .service(friends::remove_friendship)
        .service(recommendations::recommend)
        .service(recommendations::received)
        .service(recommendations::mark_read)
        .service(notifications::unread_count)
        .service(notifications::mark_all_read)
        .service(notifications::list_notifications)
        .service(notifications::mark_read)
        .service(admin::stats)
        .service(admin::list_books)
        .service(admin::create_book)
        .service(admin::update_book)
        .service(admin::delete_book)
        .service(admin::list_users)
        .service(admin::user_books);
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::days(14)),
        )
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding and backend settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the catalog client cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        catalog: _,
        admin_policy: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;
    use shelfmate::domain::ports::{FIXTURE_EMAIL, FIXTURE_PASSWORD};
    use shelfmate::inbound::http::state::HttpStatePorts;

    fn deps() -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(HttpState::new(HttpStatePorts::fixtures())),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[rstest]
    #[case("/api/v1/notifications/unread-count")]
    #[case("/api/v1/friends/requests")]
    #[case("/api/v1/profiles/me")]
    #[actix_web::test]
    async fn protected_routes_require_a_session(#[case] uri: &str) {
        let app = actix_test::init_service(build_app(deps())).await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn login_then_read_all_routes_to_literal_handler() {
        let app = actix_test::init_service(build_app(deps())).await;
        let login = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(serde_json::json!({
                    "email": FIXTURE_EMAIL,
                    "password": FIXTURE_PASSWORD,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/notifications/read-all")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.get("updated").is_some());
    }

    #[actix_web::test]
    async fn health_checks_are_outside_the_api_scope() {
        let deps = deps();
        deps.health_state.mark_ready();
        let app = actix_test::init_service(build_app(deps)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
