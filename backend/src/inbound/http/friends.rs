//! Friendship handlers.
//!
//! ```text
//! GET /api/v1/friends
//! GET /api/v1/friends/requests
//! GET /api/v1/friends/status/{userId}
//! POST /api/v1/friends/requests {"addresseeId":"..."}
//! POST /api/v1/friends/requests/{id}/accept
//! DELETE /api/v1/friends/{id}
//! ```
//!
//! `DELETE` covers rejecting, cancelling and unfriending alike.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{FriendRequest, Friendship, Profile, RelationshipStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::locale::RequestLocale;
use crate::inbound::http::schemas::{
    ErrorSchema, FriendRequestSchema, FriendshipSchema, ProfileSchema, RelationshipStatusSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_friendship_id, parse_user_id};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub addressee_id: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/friends",
    responses(
        (status = 200, description = "Accepted friends", body = [ProfileSchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "listFriends"
)]
#[get("/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Profile>>> {
    let user_id = session.require_user_id()?;
    let friends = state.friendships_query.friends(&user_id).await?;
    Ok(web::Json(friends))
}

#[utoipa::path(
    get,
    path = "/api/v1/friends/requests",
    responses(
        (status = 200, description = "Pending incoming requests", body = [FriendRequestSchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "incomingRequests"
)]
#[get("/friends/requests")]
pub async fn incoming_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<FriendRequest>>> {
    let user_id = session.require_user_id()?;
    let requests = state.friendships_query.incoming_requests(&user_id).await?;
    Ok(web::Json(requests))
}

/// How the signed-in reader relates to another reader.
#[utoipa::path(
    get,
    path = "/api/v1/friends/status/{userId}",
    params(("userId" = String, Path, description = "Other reader")),
    responses(
        (status = 200, description = "Relationship", body = RelationshipStatusSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "relationshipStatus"
)]
#[get("/friends/status/{user_id}")]
pub async fn relationship_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RelationshipStatus>> {
    let viewer = session.require_user_id()?;
    let other = parse_user_id(&path.into_inner(), FieldName::new("userId"))?;
    let status = state
        .friendships_query
        .relationship(&viewer, &other)
        .await?;
    Ok(web::Json(status))
}

/// Send a friend request and notify the addressee.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests",
    request_body = FriendRequestBody,
    responses(
        (status = 201, description = "Request sent", body = FriendshipSchema),
        (status = 400, description = "Malformed id or self request", body = ErrorSchema),
        (status = 404, description = "Unknown addressee", body = ErrorSchema),
        (status = 409, description = "Pair already linked", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "sendFriendRequest"
)]
#[post("/friends/requests")]
pub async fn send_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    locale: RequestLocale,
    payload: web::Json<FriendRequestBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let addressee = parse_user_id(&payload.addressee_id, FieldName::new("addresseeId"))?;
    let friendship: Friendship = state
        .friendships
        .send_request(&requester, &addressee, locale.get())
        .await?;
    info!(friendship_id = %friendship.id, "friend request sent");
    Ok(HttpResponse::Created().json(friendship))
}

#[utoipa::path(
    post,
    path = "/api/v1/friends/requests/{id}/accept",
    params(("id" = String, Path, description = "Friendship id")),
    responses(
        (status = 200, description = "Request accepted", body = FriendshipSchema),
        (status = 404, description = "No pending request for this reader", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "acceptFriendRequest"
)]
#[post("/friends/requests/{id}/accept")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    locale: RequestLocale,
    path: web::Path<String>,
) -> ApiResult<web::Json<Friendship>> {
    let user_id = session.require_user_id()?;
    let friendship_id = parse_friendship_id(&path.into_inner(), FieldName::new("id"))?;
    let friendship = state
        .friendships
        .accept(&user_id, &friendship_id, locale.get())
        .await?;
    Ok(web::Json(friendship))
}

#[utoipa::path(
    delete,
    path = "/api/v1/friends/{id}",
    params(("id" = String, Path, description = "Friendship id")),
    responses(
        (status = 204, description = "Friendship removed"),
        (status = 404, description = "Not a party to this friendship", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "removeFriendship"
)]
#[delete("/friends/{id}")]
pub async fn remove_friendship(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let friendship_id = parse_friendship_id(&path.into_inner(), FieldName::new("id"))?;
    state.friendships.remove(&user_id, &friendship_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
