//! Admin dashboard handlers.
//!
//! ```text
//! GET /api/v1/admin/stats
//! GET /api/v1/admin/books?q=madonna
//! POST /api/v1/admin/books
//! PUT /api/v1/admin/books/{id}
//! DELETE /api/v1/admin/books/{id}
//! GET /api/v1/admin/users
//! GET /api/v1/admin/users/{id}/books
//! ```
//!
//! The handlers only resolve the caller; the admin ports decide whether the
//! caller may proceed and answer `403` otherwise.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AdminUserSummary, Book, BookDraft, BookValidationError, DashboardStats, Error, LibraryEntry,
    NewBook, SearchQuery,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{
    AdminUserSummarySchema, BookSchema, DashboardStatsSchema, ErrorSchema, LibraryEntrySchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_book_id, parse_user_id};

/// Admin book form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[schema(example = "Kürk Mantolu Madonna")]
    pub title: Option<String>,
    #[schema(example = "Sabahattin Ali")]
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    #[schema(minimum = 0)]
    pub page_count: Option<i32>,
    pub description: Option<String>,
}

impl From<BookRequest> for BookDraft {
    fn from(value: BookRequest) -> Self {
        Self {
            title: value.title,
            author: value.author,
            cover_url: value.cover_url,
            isbn: value.isbn,
            publisher: value.publisher,
            published_date: value.published_date,
            page_count: value.page_count,
            description: value.description,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminBookParams {
    /// Title or author fragment.
    pub q: Option<String>,
}

fn map_book_validation_error(err: BookValidationError) -> Error {
    let (field, code) = match &err {
        BookValidationError::MissingField { field } => (*field, "missing_field"),
        BookValidationError::FieldTooLong { field, .. } => (*field, "too_long"),
        BookValidationError::InvalidUrl { field } => (*field, "invalid_url"),
        BookValidationError::NegativePageCount => ("pageCount", "negative"),
        BookValidationError::EmptyId | BookValidationError::InvalidId => ("id", "invalid_book_id"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn validated_book(payload: web::Json<BookRequest>) -> ApiResult<NewBook> {
    NewBook::try_from_draft(payload.into_inner().into()).map_err(map_book_validation_error)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStatsSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/admin/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let stats: DashboardStats = state.admin_query.stats(&caller).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/books",
    params(AdminBookParams),
    responses(
        (status = 200, description = "Local books", body = [BookSchema]),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminBooks"
)]
#[get("/admin/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<AdminBookParams>,
) -> ApiResult<web::Json<Vec<Book>>> {
    let caller = session.require_user_id()?;
    let query = params.q.as_deref().and_then(SearchQuery::parse);
    let books = state.admin_query.books(&caller, query).await?;
    Ok(web::Json(books))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookSchema),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminCreateBook"
)]
#[post("/admin/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let book = validated_book(payload)?;
    let created = state.admin.create_book(&caller, &book).await?;
    info!(book_id = %created.id, "admin created book");
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/books/{id}",
    params(("id" = String, Path, description = "Local book UUID")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookSchema),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateBook"
)]
#[put("/admin/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<BookRequest>,
) -> ApiResult<web::Json<Book>> {
    let caller = session.require_user_id()?;
    let book_id = parse_book_id(&path.into_inner(), FieldName::new("id"))?;
    let book = validated_book(payload)?;
    let updated = state.admin.update_book(&caller, &book_id, &book).await?;
    Ok(web::Json(updated))
}

/// Delete a book with its shelf entries and recommendations.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/books/{id}",
    params(("id" = String, Path, description = "Local book UUID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteBook"
)]
#[delete("/admin/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let book_id = parse_book_id(&path.into_inner(), FieldName::new("id"))?;
    state.admin.delete_book(&caller, &book_id).await?;
    info!(%book_id, "admin deleted book");
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Readers with activity counts", body = [AdminUserSummarySchema]),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AdminUserSummary>>> {
    let caller = session.require_user_id()?;
    let users = state.admin_query.users(&caller).await?;
    Ok(web::Json(users))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}/books",
    params(("id" = String, Path, description = "Reader id")),
    responses(
        (status = 200, description = "Reader's recent shelf entries", body = [LibraryEntrySchema]),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUserBooks"
)]
#[get("/admin/users/{id}/books")]
pub async fn user_books(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<LibraryEntry>>> {
    let caller = session.require_user_id()?;
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let entries = state.admin_query.user_books(&caller, &user_id).await?;
    Ok(web::Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::{FIXTURE_BOOK_ID, MockAdminCommand, MockAdminQuery, fixture_book};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{fixture_state, login_cookie, state_with, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(stats)
            .service(list_books)
            .service(create_book)
            .service(update_book)
            .service(delete_book)
            .service(list_users)
            .service(user_books);
    }

    fn valid_book() -> BookRequest {
        BookRequest {
            title: Some("İnce Memed".to_owned()),
            author: Some("Yaşar Kemal".to_owned()),
            page_count: Some(436),
            ..BookRequest::default()
        }
    }

    #[rstest]
    #[case("/api/v1/admin/stats")]
    #[case("/api/v1/admin/books")]
    #[case("/api/v1/admin/users")]
    #[actix_web::test]
    async fn non_admins_are_forbidden(#[case] uri: &str) {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(uri)
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn anonymous_callers_are_unauthorised() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/stats")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_book_validates_before_calling_port() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/books")
                .cookie(cookie)
                .set_json(BookRequest {
                    title: Some("   ".to_owned()),
                    ..valid_book()
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "title");
        assert_eq!(body["details"]["code"], "missing_field");
    }

    #[actix_web::test]
    async fn admin_creates_book() {
        let mut admin = MockAdminCommand::new();
        admin
            .expect_create_book()
            .withf(|_, book| book.title == "İnce Memed" && book.page_count == Some(436))
            .times(1)
            .returning(|_, book| {
                let mut created = fixture_book(None);
                created.title = book.title.clone();
                created.author = book.author.clone();
                Ok(created)
            });
        let ports = HttpStatePorts {
            admin: Arc::new(admin),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state_with(ports), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/books")
                .cookie(cookie)
                .set_json(valid_book())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["author"], "Yaşar Kemal");
    }

    #[actix_web::test]
    async fn admin_deletes_book() {
        let mut admin = MockAdminCommand::new();
        admin
            .expect_delete_book()
            .withf(|_, id| id.to_string() == FIXTURE_BOOK_ID)
            .times(1)
            .returning(|_, _| Ok(()));
        let ports = HttpStatePorts {
            admin: Arc::new(admin),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state_with(ports), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/books/{FIXTURE_BOOK_ID}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn short_search_lists_all_books() {
        let mut query = MockAdminQuery::new();
        query
            .expect_books()
            .withf(|_, q| q.is_none())
            .times(1)
            .returning(|_, _| Ok(vec![fixture_book(None)]));
        let ports = HttpStatePorts {
            admin_query: Arc::new(query),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state_with(ports), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/books?q=k")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }
}
