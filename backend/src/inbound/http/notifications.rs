//! Notification inbox handlers.
//!
//! ```text
//! GET /api/v1/notifications?limit=20
//! GET /api/v1/notifications/unread-count
//! POST /api/v1/notifications/{id}/read
//! POST /api/v1/notifications/read-all
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Notification, NotificationLimit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{ErrorSchema, NotificationSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_notification_id};

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationParams {
    /// Page size, 1 to 100; defaults to 20.
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    /// Notifications flipped from unread to read.
    pub updated: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(NotificationParams),
    responses(
        (status = 200, description = "Newest notifications", body = [NotificationSchema]),
        (status = 400, description = "Limit out of range", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<NotificationParams>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let requested = params.into_inner().limit;
    let limit = NotificationLimit::new(requested).map_err(|err| {
        let value = requested.map(|v| v.to_string()).unwrap_or_default();
        invalid_field_error(FieldName::new("limit"), value, err)
    })?;
    let notifications: Vec<Notification> =
        state.notifications_query.list(&user_id, limit).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(notifications))
}

/// Badge count for the navigation bar.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notifications", body = UnreadCountResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "unreadCount"
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let count = state.notifications_query.unread_count(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(UnreadCountResponse { count }))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Not in this reader's inbox", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_notification_id(&path.into_inner(), FieldName::new("id"))?;
    state.notifications.mark_read(&user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Inbox marked read", body = MarkAllReadResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkAllReadResponse>> {
    let user_id = session.require_user_id()?;
    let updated = state.notifications.mark_all_read(&user_id).await?;
    Ok(web::Json(MarkAllReadResponse { updated }))
}
