//! Reader identity and profile data model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Validation errors returned by the user and profile constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    InvalidUsername,
    FieldTooLong { field: &'static str, max: usize },
    InvalidUrl { field: &'static str },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidUsername => write!(
                f,
                "username must be a non-empty email local part without spaces",
            ),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::InvalidUrl { field } => write!(f, "{field} must be an http(s) URL"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Maximum accepted length for an email address.
pub const EMAIL_MAX: usize = 254;

/// Normalised (trimmed, lowercase) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use shelfmate::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Example.org ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.org");
    /// assert_eq!(email.local_part(), "ada");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalized.chars().count() > EMAIL_MAX || !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Portion of the address before `@`, used as the public username.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(self.0.as_str())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public handle used in profile URLs; the local part of the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validate a username taken from a URL path segment.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        let valid = !normalized.is_empty()
            && normalized.len() <= 64
            && !normalized.contains('@')
            && !normalized.chars().any(char::is_whitespace);
        if !valid {
            return Err(UserValidationError::InvalidUsername);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Reader profile as stored by the service.
///
/// ## Invariants
/// - `email` is normalised and unique across profiles.
/// - Optional text fields are never empty strings; blank input is stored as
///   `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Minimal profile with no optional fields set.
    pub fn new(id: UserId, email: EmailAddress, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            full_name: None,
            avatar_url: None,
            bio: None,
            location: None,
            website: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Name shown to other readers: the full name, else the email local part.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use shelfmate::domain::{EmailAddress, Profile, UserId};
    ///
    /// let email = EmailAddress::new("ada@example.org").expect("valid email");
    /// let mut profile = Profile::new(UserId::random(), email, Utc::now());
    /// assert_eq!(profile.display_label(), "ada");
    /// profile.full_name = Some("Ada Lovelace".to_owned());
    /// assert_eq!(profile.display_label(), "Ada Lovelace");
    /// ```
    pub fn display_label(&self) -> &str {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.email.local_part(),
        }
    }

    /// Public username derived from the email address.
    pub fn username(&self) -> &str {
        self.email.local_part()
    }
}

/// Maximum length of a full name.
pub const FULL_NAME_MAX: usize = 100;
/// Maximum length of a biography.
pub const BIO_MAX: usize = 500;
/// Maximum length of a location string.
pub const LOCATION_MAX: usize = 100;
/// Maximum length of a URL field.
pub const URL_MAX: usize = 2048;

/// Validated settings-form update for a profile.
///
/// Blank strings clear the corresponding field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}

/// Raw settings-form values prior to validation.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateDraft {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Validate a settings-form submission.
    pub fn try_from_draft(draft: ProfileUpdateDraft) -> Result<Self, UserValidationError> {
        Ok(Self {
            full_name: bounded_text(draft.full_name, "fullName", FULL_NAME_MAX)?,
            bio: bounded_text(draft.bio, "bio", BIO_MAX)?,
            location: bounded_text(draft.location, "location", LOCATION_MAX)?,
            website: http_url(draft.website, "website")?,
            avatar_url: http_url(draft.avatar_url, "avatarUrl")?,
        })
    }
}

/// Trim optional text, mapping blanks to `None` and enforcing a length cap.
pub(crate) fn bounded_text(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, UserValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(UserValidationError::FieldTooLong { field, max });
    }
    Ok(Some(trimmed.to_owned()))
}

fn http_url(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, UserValidationError> {
    let Some(text) = bounded_text(value, field, URL_MAX)? else {
        return Ok(None);
    };
    let parsed = Url::parse(&text).map_err(|_| UserValidationError::InvalidUrl { field })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UserValidationError::InvalidUrl { field });
    }
    Ok(Some(text))
}
