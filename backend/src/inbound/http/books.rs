//! Book lookup and search handlers.
//!
//! Both endpoints are public. Catalog results are localised through
//! [`RequestLocale`], which controls the placeholder author name for volumes
//! without one.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::BookSummary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::locale::RequestLocale;
use crate::inbound::http::schemas::{BookSummarySchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_book_ref};

/// Query string for `GET /api/v1/search`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookSearchParams {
    /// Title, author or ISBN fragment; fewer than two characters returns nothing.
    pub q: Option<String>,
}

/// Book detail by local UUID or `google_<volumeId>`.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Local UUID or google_ catalog id")),
    responses(
        (status = 200, description = "Book detail", body = BookSummarySchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema),
        (status = 503, description = "Catalog unavailable", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    locale: RequestLocale,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookSummary>> {
    let book_ref = parse_book_ref(&path.into_inner(), FieldName::new("id"))?;
    let book = state.books.book(&book_ref, locale.get()).await?;
    Ok(web::Json(book))
}

/// Search local books first, then the catalog.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(BookSearchParams),
    responses(
        (status = 200, description = "Merged results", body = [BookSummarySchema]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "searchBooks",
    security([])
)]
#[get("/search")]
pub async fn search_books(
    state: web::Data<HttpState>,
    locale: RequestLocale,
    params: web::Query<BookSearchParams>,
) -> ApiResult<web::Json<Vec<BookSummary>>> {
    let query = params.into_inner().q.unwrap_or_default();
    let results = state.books.search(&query, locale.get()).await?;
    Ok(web::Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use serde_json::Value;

    use crate::domain::Locale;
    use crate::domain::ports::{FIXTURE_BOOK_ID, MockBookQuery};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{fixture_state, state_with, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(get_book).service(search_books);
    }

    #[actix_web::test]
    async fn fixture_book_is_served_by_uuid() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/books/{FIXTURE_BOOK_ID}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["title"], "Kürk Mantolu Madonna");
        assert_eq!(body["source"], "local");
    }

    #[actix_web::test]
    async fn malformed_book_id_is_a_bad_request() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/books/isbn-123")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "invalid_book_id");
    }

    #[actix_web::test]
    async fn unknown_catalog_volume_is_not_found() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/books/google_zyTCAlFPjgYC")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn search_matches_fixture_title() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/search?q=madonna")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn search_uses_accept_language() {
        let mut books = MockBookQuery::new();
        books
            .expect_search()
            .withf(|query, locale| query == "dune" && *locale == Locale::En)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let ports = HttpStatePorts {
            books: Arc::new(books),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state_with(ports), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/search?q=dune")
                .insert_header((header::ACCEPT_LANGUAGE, "en-GB,en;q=0.8"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
