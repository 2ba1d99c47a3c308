//! Translation of driven-port errors into API errors.
//!
//! Connection failures become `service_unavailable`, query failures become
//! `internal`, and domain-specific variants map to the client-facing code
//! they imply.

use serde_json::json;

use super::Error;
use super::ports::{
    AccountRepositoryError, AdminRepositoryError, BookCatalogSourceError, BookRepositoryError,
    FriendshipRepositoryError, LibraryRepositoryError, NotificationRepositoryError,
    RecommendationRepositoryError,
};

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { .. } => {
            Error::conflict("an account already exists for this email")
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
    }
}

pub(crate) fn map_book_error(error: BookRepositoryError) -> Error {
    match error {
        BookRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("book repository unavailable: {message}"))
        }
        BookRepositoryError::Query { message } => {
            Error::internal(format!("book repository error: {message}"))
        }
    }
}

pub(crate) fn map_library_error(error: LibraryRepositoryError) -> Error {
    match error {
        LibraryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("library repository unavailable: {message}"))
        }
        LibraryRepositoryError::Query { message } => {
            Error::internal(format!("library repository error: {message}"))
        }
        LibraryRepositoryError::MissingBook { book_id } => {
            Error::not_found(format!("book {book_id} not found"))
        }
    }
}

pub(crate) fn map_friendship_error(error: FriendshipRepositoryError) -> Error {
    match error {
        FriendshipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("friendship repository unavailable: {message}"))
        }
        FriendshipRepositoryError::Query { message } => {
            Error::internal(format!("friendship repository error: {message}"))
        }
        FriendshipRepositoryError::AlreadyExists { .. } => friendship_exists(),
    }
}

pub(crate) fn friendship_exists() -> Error {
    Error::conflict("a friendship or pending request already exists")
        .with_details(json!({ "code": "friendship_exists" }))
}

pub(crate) fn map_recommendation_error(error: RecommendationRepositoryError) -> Error {
    match error {
        RecommendationRepositoryError::Connection { message } => Error::service_unavailable(
            format!("recommendation repository unavailable: {message}"),
        ),
        RecommendationRepositoryError::Query { message } => {
            Error::internal(format!("recommendation repository error: {message}"))
        }
    }
}

pub(crate) fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => Error::service_unavailable(
            format!("notification repository unavailable: {message}"),
        ),
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

pub(crate) fn map_admin_error(error: AdminRepositoryError) -> Error {
    match error {
        AdminRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("admin repository unavailable: {message}"))
        }
        AdminRepositoryError::Query { message } => {
            Error::internal(format!("admin repository error: {message}"))
        }
    }
}

/// Catalog failures on paths where the catalog is required (detail pages
/// and imports). Search degrades to local results instead.
pub(crate) fn map_catalog_error(error: BookCatalogSourceError) -> Error {
    match error {
        BookCatalogSourceError::Transport { .. }
        | BookCatalogSourceError::Timeout { .. }
        | BookCatalogSourceError::RateLimited { .. } => {
            Error::service_unavailable(format!("book catalog unavailable: {error}"))
        }
        BookCatalogSourceError::Decode { .. } | BookCatalogSourceError::InvalidRequest { .. } => {
            Error::internal(format!("book catalog error: {error}"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(AccountRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(AccountRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(AccountRepositoryError::duplicate_email("a@b.co"), ErrorCode::Conflict)]
    fn account_errors_map_to_codes(
        #[case] error: AccountRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_account_error(error).code(), expected);
    }

    #[rstest]
    #[case(BookCatalogSourceError::timeout("10s"), ErrorCode::ServiceUnavailable)]
    #[case(BookCatalogSourceError::rate_limited("429"), ErrorCode::ServiceUnavailable)]
    #[case(BookCatalogSourceError::decode("bad json"), ErrorCode::InternalError)]
    fn catalog_errors_map_to_codes(
        #[case] error: BookCatalogSourceError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_catalog_error(error).code(), expected);
    }

    #[rstest]
    fn missing_book_is_not_found() {
        let error = map_library_error(LibraryRepositoryError::missing_book("abc"));
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn existing_friendship_carries_detail_code() {
        let error = map_friendship_error(FriendshipRepositoryError::already_exists("pair"));
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(
            error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
            Some("friendship_exists")
        );
    }
}
