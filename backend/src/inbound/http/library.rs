//! Personal library handlers.
//!
//! ```text
//! POST /api/v1/library {"bookId":"google_zyTCAlFPjgYC"}
//! GET /api/v1/library?status=reading
//! GET /api/v1/library/{bookId}
//! PUT /api/v1/library/{bookId}/status {"status":"finished"}
//! PUT /api/v1/library/{bookId}/review {"rating":4,"notes":"..."}
//! PUT /api/v1/library/{bookId}/favorite {"isFavorite":true}
//! GET /api/v1/feed
//! ```
//!
//! Adding a catalog volume imports it first, so the stored entry always
//! references a local book.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::StatusChangeOutcome;
use crate::domain::{AddOutcome, LibraryEntry, ReadingStatus, ReviewUpdate, StatusChange};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::locale::RequestLocale;
use crate::inbound::http::schemas::{ErrorSchema, LibraryEntrySchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_book_id, parse_book_ref,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToLibraryRequest {
    /// Local UUID or `google_<volumeId>`.
    #[schema(example = "google_zyTCAlFPjgYC")]
    pub book_id: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusRequest {
    /// `want_to_read`, `reading`, `finished`, or `remove`.
    #[schema(example = "reading")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReviewRequest {
    /// 1 to 5; `0` or `null` clears the rating.
    #[schema(minimum = 0, maximum = 5)]
    pub rating: Option<i16>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LibraryParams {
    /// Restrict to one reading status.
    pub status: Option<String>,
}

fn parse_status_filter(raw: Option<String>) -> ApiResult<Option<ReadingStatus>> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .trim()
                .parse::<ReadingStatus>()
                .map_err(|err| invalid_field_error(FieldName::new("status"), &value, err))
        })
        .transpose()
}

/// Shelve a book; repeat adds return the existing entry.
#[utoipa::path(
    post,
    path = "/api/v1/library",
    request_body = AddToLibraryRequest,
    responses(
        (status = 201, description = "Book shelved", body = LibraryEntrySchema),
        (status = 200, description = "Book was already shelved", body = LibraryEntrySchema),
        (status = 400, description = "Malformed book id", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "addToLibrary"
)]
#[post("/library")]
pub async fn add_to_library(
    state: web::Data<HttpState>,
    session: SessionContext,
    locale: RequestLocale,
    payload: web::Json<AddToLibraryRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let book_ref = parse_book_ref(&payload.book_id, FieldName::new("bookId"))?;
    let outcome = state.library.add(&user_id, &book_ref, locale.get()).await?;
    Ok(match outcome {
        AddOutcome::Created(entry) => HttpResponse::Created().json(entry),
        AddOutcome::AlreadyShelved(entry) => HttpResponse::Ok().json(entry),
    })
}

/// The reader's shelf, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/library",
    params(LibraryParams),
    responses(
        (status = 200, description = "Library entries", body = [LibraryEntrySchema]),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "listLibrary"
)]
#[get("/library")]
pub async fn list_library(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<LibraryParams>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let status = parse_status_filter(params.into_inner().status)?;
    let entries = state.library_query.library(&user_id, status).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(entries))
}

/// One shelf entry, used by the book detail page.
#[utoipa::path(
    get,
    path = "/api/v1/library/{bookId}",
    params(("bookId" = String, Path, description = "Local book UUID")),
    responses(
        (status = 200, description = "Library entry", body = LibraryEntrySchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not on the shelf", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "getLibraryEntry"
)]
#[get("/library/{book_id}")]
pub async fn get_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LibraryEntry>> {
    let user_id = session.require_user_id()?;
    let book_id = parse_book_id(&path.into_inner(), FieldName::new("bookId"))?;
    let entry = state.library_query.entry(&user_id, &book_id).await?;
    Ok(web::Json(entry))
}

/// Move a book between shelves, or remove it with `remove`.
#[utoipa::path(
    put,
    path = "/api/v1/library/{bookId}/status",
    params(("bookId" = String, Path, description = "Local book UUID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = LibraryEntrySchema),
        (status = 204, description = "Entry removed"),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 404, description = "Not on the shelf", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "changeStatus"
)]
#[put("/library/{book_id}/status")]
pub async fn change_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let book_id = parse_book_id(&path.into_inner(), FieldName::new("bookId"))?;
    let raw = payload.into_inner().status;
    let change = StatusChange::parse(&raw)
        .map_err(|err| invalid_field_error(FieldName::new("status"), &raw, err))?;
    let outcome = state
        .library
        .change_status(&user_id, &book_id, change)
        .await?;
    Ok(match outcome {
        StatusChangeOutcome::Updated(entry) => HttpResponse::Ok().json(entry),
        StatusChangeOutcome::Removed => HttpResponse::NoContent().finish(),
    })
}

/// Replace rating and notes.
#[utoipa::path(
    put,
    path = "/api/v1/library/{bookId}/review",
    params(("bookId" = String, Path, description = "Local book UUID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review saved", body = LibraryEntrySchema),
        (status = 400, description = "Rating out of range or notes too long", body = ErrorSchema),
        (status = 404, description = "Not on the shelf", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "reviewBook"
)]
#[put("/library/{book_id}/review")]
pub async fn review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<LibraryEntry>> {
    let user_id = session.require_user_id()?;
    let book_id = parse_book_id(&path.into_inner(), FieldName::new("bookId"))?;
    let ReviewRequest { rating, notes } = payload.into_inner();
    let update = ReviewUpdate::try_new(rating, notes).map_err(|err| {
        let value = rating.map(|r| r.to_string()).unwrap_or_default();
        invalid_field_error(FieldName::new("review"), value, err)
    })?;
    let entry = state.library.review(&user_id, &book_id, &update).await?;
    Ok(web::Json(entry))
}

/// Mark or unmark a favourite.
#[utoipa::path(
    put,
    path = "/api/v1/library/{bookId}/favorite",
    params(("bookId" = String, Path, description = "Local book UUID")),
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Favourite flag saved", body = LibraryEntrySchema),
        (status = 404, description = "Not on the shelf", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "setFavorite"
)]
#[put("/library/{book_id}/favorite")]
pub async fn set_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<FavoriteRequest>,
) -> ApiResult<web::Json<LibraryEntry>> {
    let user_id = session.require_user_id()?;
    let book_id = parse_book_id(&path.into_inner(), FieldName::new("bookId"))?;
    let entry = state
        .library
        .set_favorite(&user_id, &book_id, payload.is_favorite)
        .await?;
    Ok(web::Json(entry))
}

/// Recently updated entries for the home page.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    responses(
        (status = 200, description = "Recent entries", body = [LibraryEntrySchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "feed"
)]
#[get("/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let entries = state.library_query.feed(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(entries))
}
