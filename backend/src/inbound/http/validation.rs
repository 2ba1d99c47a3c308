//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and payload identifiers are parsed here so every handler reports
//! malformed input with the same `details` shape: `field`, `value`, `code`.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    BookId, BookRef, Error, FriendshipId, NotificationId, RecommendationId, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidBookId,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidBookId => "invalid_book_id",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Reject a field value with the validator's own message.
pub(crate) fn invalid_field_error(
    field: FieldName,
    value: impl Into<String>,
    message: impl std::fmt::Display,
) -> Error {
    ValidationError::new(field.as_str(), message.to_string())
        .with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_book_id(value: &str, field: FieldName) -> Result<BookId, Error> {
    parse_uuid(value, field).map(BookId::from_uuid)
}

pub(crate) fn parse_friendship_id(value: &str, field: FieldName) -> Result<FriendshipId, Error> {
    parse_uuid(value, field).map(FriendshipId::from_uuid)
}

pub(crate) fn parse_recommendation_id(
    value: &str,
    field: FieldName,
) -> Result<RecommendationId, Error> {
    parse_uuid(value, field).map(RecommendationId::from_uuid)
}

pub(crate) fn parse_notification_id(
    value: &str,
    field: FieldName,
) -> Result<NotificationId, Error> {
    parse_uuid(value, field).map(NotificationId::from_uuid)
}

/// Parse a local UUID or a `google_` catalog id.
pub(crate) fn parse_book_ref(value: &str, field: FieldName) -> Result<BookRef, Error> {
    BookRef::parse(value).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidBookId, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn invalid_uuid_reports_field_and_value() {
        let err = parse_uuid("nope", FieldName::new("receiverId")).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("receiverId"));
        assert_eq!(detail(&err, "value"), Some("nope"));
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
    }

    #[rstest]
    #[case("google_zyTCAlFPjgYC", true)]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case("isbn:123", false)]
    #[case("  ", false)]
    fn book_refs_accept_uuids_and_catalog_ids(#[case] raw: &str, #[case] ok: bool) {
        let parsed = parse_book_ref(raw, FieldName::new("bookId"));
        assert_eq!(parsed.is_ok(), ok, "{raw}");
        if let Err(err) = parsed {
            assert_eq!(detail(&err, "code"), Some("invalid_book_id"));
        }
    }

    #[rstest]
    fn missing_field_uses_stable_code() {
        let err = missing_field_error(FieldName::new("status"));
        assert_eq!(err.message(), "missing required field: status");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }
}
