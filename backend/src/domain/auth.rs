//! Authentication primitives such as login credentials and password digests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{
    EmailAddress, Locale, Profile, UserValidationError, user::FULL_NAME_MAX, user::bounded_text,
};

/// Minimum accepted password length for new accounts.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length; keeps hashing cost bounded.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login or sign-up payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email was not a plausible address.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`] or longer than [`PASSWORD_MAX`].
    PasswordLength { min: usize, max: usize },
    /// Full name exceeded its maximum length.
    FullNameTooLong { max: usize },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordLength { min, max } => {
                write!(f, "password must be between {min} and {max} characters")
            }
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

fn parse_email(raw: &str) -> Result<EmailAddress, LoginValidationError> {
    EmailAddress::new(raw).map_err(|err| match err {
        UserValidationError::EmptyEmail => LoginValidationError::EmptyEmail,
        _ => LoginValidationError::InvalidEmail,
    })
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use shelfmate::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.org", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.org");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = parse_email(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for account lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    full_name: Option<String>,
}

impl Registration {
    /// Validate sign-up inputs, applying the password length policy.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<Self, LoginValidationError> {
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        let length = password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(LoginValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        let full_name = bounded_text(full_name, "fullName", FULL_NAME_MAX).map_err(|_| {
            LoginValidationError::FullNameTooLong { max: FULL_NAME_MAX }
        })?;
        Ok(Self {
            credentials,
            full_name,
        })
    }

    /// Email and password portion of the registration.
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Optional display name supplied at sign-up.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }
}

/// Errors raised while producing a password digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordDigestError {
    message: String,
}

/// Argon2id digest of an account password in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordDigestError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordDigestError {
                message: err.to_string(),
            })
    }

    /// Wrap a digest loaded from storage.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a plaintext password against this digest.
    ///
    /// Malformed stored digests never verify.
    pub fn verify(&self, password: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(%error, "stored password digest is malformed");
                false
            }
        }
    }

    /// PHC string suitable for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Signed-in reader as reported by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub is_admin: bool,
    pub language: Locale,
}
