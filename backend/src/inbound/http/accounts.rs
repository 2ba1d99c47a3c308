//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/signup {"email":"ada@example.org","password":"secret1","fullName":"Ada"}
//! POST /api/v1/login {"email":"ada@example.org","password":"secret1"}
//! POST /api/v1/logout
//! GET /api/v1/session
//! PUT /api/v1/session/language {"language":"en"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, Locale, LoginCredentials, LoginValidationError, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::locale::RequestLocale;
use crate::inbound::http::schemas::{ErrorSchema, ProfileSchema, SessionProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};

/// Sign-up request body for `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

impl TryFrom<SignupRequest> for Registration {
    type Error = LoginValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password, value.full_name)
    }
}

/// Body for `PUT /api/v1/session/language`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LanguageRequest {
    #[schema(example = "en")]
    pub language: String,
}

/// Echo of the stored language.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LanguageResponse {
    #[schema(example = "en")]
    pub language: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::InvalidEmail => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
        LoginValidationError::PasswordLength { .. } => ("password", "password_length"),
        LoginValidationError::FullNameTooLong { .. } => ("fullName", "full_name_too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create an account and sign the new reader in.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let profile = state.accounts.sign_up(&registration).await?;
    session.persist_user(&profile.id)?;
    info!(user_id = %profile.id, "reader signed up");
    Ok(HttpResponse::Created().json(profile))
}

/// Authenticate a reader and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = ProfileSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let profile = state.accounts.log_in(&credentials).await?;
    session.persist_user(&profile.id)?;
    Ok(HttpResponse::Ok().json(profile))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Signed-in reader with admin flag and interface language.
///
/// A session whose profile has since been deleted is cleared and treated as
/// signed out.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionProfileSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    locale: RequestLocale,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = session
        .expire_on_unauthorized(state.profiles.session_profile(&user_id, locale.get()).await)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(profile))
}

/// Store the interface language in the session.
#[utoipa::path(
    put,
    path = "/api/v1/session/language",
    request_body = LanguageRequest,
    responses(
        (status = 200, description = "Language stored", body = LanguageResponse),
        (status = 400, description = "Unsupported language", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "setLanguage",
    security([])
)]
#[put("/session/language")]
pub async fn set_language(
    session: SessionContext,
    payload: web::Json<LanguageRequest>,
) -> ApiResult<web::Json<LanguageResponse>> {
    let LanguageRequest { language } = payload.into_inner();
    let locale: Locale = language
        .parse()
        .map_err(|err| invalid_field_error(FieldName::new("language"), &language, err))?;
    session.persist_language(locale)?;
    Ok(web::Json(LanguageResponse {
        language: locale.as_str().to_owned(),
    }))
}
