//! Recommendation handlers.
//!
//! ```text
//! POST /api/v1/recommendations {"receiverId":"...","bookId":"...","message":"..."}
//! GET /api/v1/recommendations
//! POST /api/v1/recommendations/{id}/read
//! ```
//!
//! Sending to the same reader twice replaces the earlier message and resets
//! its read flag; the receiver is notified in the sender's language.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ReceivedRecommendation;
use crate::domain::ports::RecommendBookRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::locale::RequestLocale;
use crate::inbound::http::schemas::{
    ErrorSchema, ReceivedRecommendationSchema, RecommendationSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_book_id, parse_recommendation_id, parse_user_id,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub receiver_id: String,
    /// Local book UUID; catalog volumes must be shelved first.
    pub book_id: String,
    pub message: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/recommendations",
    request_body = RecommendRequest,
    responses(
        (status = 201, description = "Recommendation stored", body = RecommendationSchema),
        (status = 400, description = "Malformed request", body = ErrorSchema),
        (status = 403, description = "Receiver is not a friend", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "recommendBook"
)]
#[post("/recommendations")]
pub async fn recommend(
    state: web::Data<HttpState>,
    session: SessionContext,
    locale: RequestLocale,
    payload: web::Json<RecommendRequest>,
) -> ApiResult<HttpResponse> {
    let sender_id = session.require_user_id()?;
    let RecommendRequest {
        receiver_id,
        book_id,
        message,
    } = payload.into_inner();
    let request = RecommendBookRequest {
        sender_id,
        receiver_id: parse_user_id(&receiver_id, FieldName::new("receiverId"))?,
        book_id: parse_book_id(&book_id, FieldName::new("bookId"))?,
        message,
    };
    let recommendation = state
        .recommendations
        .recommend(&request, locale.get())
        .await?;
    Ok(HttpResponse::Created().json(recommendation))
}

#[utoipa::path(
    get,
    path = "/api/v1/recommendations",
    responses(
        (status = 200, description = "Received recommendations", body = [ReceivedRecommendationSchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "receivedRecommendations"
)]
#[get("/recommendations")]
pub async fn received(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ReceivedRecommendation>>> {
    let user_id = session.require_user_id()?;
    let items = state.recommendations_query.received(&user_id).await?;
    Ok(web::Json(items))
}

#[utoipa::path(
    post,
    path = "/api/v1/recommendations/{id}/read",
    params(("id" = String, Path, description = "Recommendation id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Not addressed to this reader", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "markRecommendationRead"
)]
#[post("/recommendations/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_recommendation_id(&path.into_inner(), FieldName::new("id"))?;
    state.recommendations.mark_read(&user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
