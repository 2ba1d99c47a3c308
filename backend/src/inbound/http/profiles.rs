//! Profile handlers.
//!
//! ```text
//! GET /api/v1/profiles/me
//! PUT /api/v1/profiles/me {"fullName":"Ada Lovelace","bio":"...","website":"https://..."}
//! GET /api/v1/profiles/me/summary
//! GET /api/v1/profiles/by-username/{username}
//! GET /api/v1/users/search?q=ada
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, ProfileUpdate, ProfileUpdateDraft, UserValidationError, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{
    ErrorSchema, ProfileSchema, ProfileSummarySchema, PublicProfileSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Settings-form body for `PUT /api/v1/profiles/me`.
///
/// Every field is written as submitted; omitted or blank fields are cleared.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[schema(example = "Ada Lovelace")]
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[schema(example = "https://ada.example.org")]
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ProfileUpdateRequest> for ProfileUpdateDraft {
    fn from(value: ProfileUpdateRequest) -> Self {
        Self {
            full_name: value.full_name,
            bio: value.bio,
            location: value.location,
            website: value.website,
            avatar_url: value.avatar_url,
        }
    }
}

/// Query string for `GET /api/v1/users/search`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserSearchParams {
    /// Name or email fragment; fewer than two characters returns nothing.
    pub q: Option<String>,
}

fn map_profile_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::FieldTooLong { field, .. } => (*field, "too_long"),
        UserValidationError::InvalidUrl { field } => (*field, "invalid_url"),
        UserValidationError::InvalidUsername => ("username", "invalid_username"),
        _ => ("profile", "invalid_value"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Signed-in reader's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/me",
    responses(
        (status = 200, description = "Own profile", body = ProfileSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "ownProfile"
)]
#[get("/profiles/me")]
pub async fn own_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = session.expire_on_unauthorized(state.profiles.profile(&user_id).await)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(profile))
}

/// Save the settings form.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileSchema),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[put("/profiles/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<crate::domain::Profile>> {
    let user_id = session.require_user_id()?;
    let update = ProfileUpdate::try_from_draft(payload.into_inner().into())
        .map_err(map_profile_validation_error)?;
    let profile =
        session.expire_on_unauthorized(state.accounts.update_profile(&user_id, &update).await)?;
    Ok(web::Json(profile))
}

/// Sidebar summary: shelf counts and favourites.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/me/summary",
    responses(
        (status = 200, description = "Profile summary", body = ProfileSummarySchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "profileSummary"
)]
#[get("/profiles/me/summary")]
pub async fn profile_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let summary = session.expire_on_unauthorized(state.profiles.summary(&user_id).await)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(summary))
}

/// Public profile page with library and counts.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/by-username/{username}",
    params(("username" = String, Path, description = "Email local part of the reader")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileSchema),
        (status = 400, description = "Malformed username", body = ErrorSchema),
        (status = 404, description = "Unknown reader", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "publicProfile",
    security([])
)]
#[get("/profiles/by-username/{username}")]
pub async fn public_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<crate::domain::PublicProfile>> {
    let username = Username::new(path.into_inner()).map_err(map_profile_validation_error)?;
    let profile = state.profiles.public_profile(&username).await?;
    Ok(web::Json(profile))
}

/// Find other readers by name or email.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(UserSearchParams),
    responses(
        (status = 200, description = "Matching readers", body = [ProfileSchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<UserSearchParams>,
) -> ApiResult<web::Json<Vec<crate::domain::Profile>>> {
    let user_id = session.require_user_id()?;
    let query = params.into_inner().q.unwrap_or_default();
    let profiles = state.profiles.search_users(&user_id, &query).await?;
    Ok(web::Json(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    use crate::domain::ports::{FIXTURE_USER_ID, MockProfileQuery, fixture_profile};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{fixture_state, login_cookie, state_with, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(own_profile)
            .service(update_profile)
            .service(profile_summary)
            .service(public_profile)
            .service(search_users);
    }

    #[actix_web::test]
    async fn own_profile_requires_a_session() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profiles/me")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn vanished_profile_clears_the_session() {
        let mut profiles = MockProfileQuery::new();
        profiles
            .expect_summary()
            .times(1)
            .returning(|_| Err(crate::domain::Error::unauthorized("login required")));
        let ports = HttpStatePorts {
            profiles: Arc::new(profiles),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state_with(ports), routes)).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profiles/me/summary")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let removal = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie issued");
        assert_eq!(removal.value(), "");
    }

    #[actix_web::test]
    async fn update_trims_and_clears_fields() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/profiles/me")
                .cookie(cookie)
                .set_json(ProfileUpdateRequest {
                    full_name: Some("  Ada King  ".to_owned()),
                    bio: Some("   ".to_owned()),
                    ..ProfileUpdateRequest::default()
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["fullName"], "Ada King");
        assert_eq!(body["bio"], Value::Null);
        assert_eq!(body["id"], FIXTURE_USER_ID);
    }

    #[actix_web::test]
    async fn update_rejects_non_http_website() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let cookie = login_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/profiles/me")
                .cookie(cookie)
                .set_json(ProfileUpdateRequest {
                    website: Some("javascript:alert(1)".to_owned()),
                    ..ProfileUpdateRequest::default()
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "website");
        assert_eq!(body["details"]["code"], "invalid_url");
    }

    #[actix_web::test]
    async fn public_profile_is_found_by_username() {
        let app = actix_test::init_service(test_app(fixture_state(), routes)).await;
        let found = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profiles/by-username/ada")
                .to_request(),
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(found).await;
        assert_eq!(body["profile"]["fullName"], "Ada Lovelace");
        assert_eq!(body["counts"]["total"], 0);

        let missing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profiles/by-username/grace")
                .to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn search_passes_query_to_port() {
        let mut profiles = MockProfileQuery::new();
        profiles
            .expect_search_users()
            .withf(|_, query| query == "lov")
            .times(1)
            .returning(|_, _| Ok(vec![fixture_profile(None).expect("fixture profile")]));
        let ports = HttpStatePorts {
            profiles: Arc::new(profiles),
            ..HttpStatePorts::fixtures()
        };
        let app = actix_test::init_service(test_app(state_with(ports), routes)).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/search?q=lov")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }
}
