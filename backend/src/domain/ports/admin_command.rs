//! Driving ports for the admin surface.
//!
//! Every operation takes the caller's id and fails with a forbidden error
//! unless the caller is a configured admin.

use async_trait::async_trait;

use crate::domain::{
    AdminUserSummary, Book, BookId, DashboardStats, Error, LibraryEntry, NewBook, SearchQuery,
    UserId,
};

/// Domain use-case port for admin book management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    async fn create_book(&self, caller: &UserId, book: &NewBook) -> Result<Book, Error>;

    async fn update_book(
        &self,
        caller: &UserId,
        book_id: &BookId,
        book: &NewBook,
    ) -> Result<Book, Error>;

    /// Delete a book together with its shelf entries and recommendations.
    async fn delete_book(&self, caller: &UserId, book_id: &BookId) -> Result<(), Error>;
}

/// Domain use-case port for admin reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminQuery: Send + Sync {
    async fn stats(&self, caller: &UserId) -> Result<DashboardStats, Error>;

    async fn books(
        &self,
        caller: &UserId,
        query: Option<SearchQuery>,
    ) -> Result<Vec<Book>, Error>;

    async fn users(&self, caller: &UserId) -> Result<Vec<AdminUserSummary>, Error>;

    async fn user_books(&self, caller: &UserId, user: &UserId)
    -> Result<Vec<LibraryEntry>, Error>;
}

fn not_admin() -> Error {
    Error::forbidden("admin access required")
}

/// Fixture command: nobody is an admin without a configured policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminCommand;

#[async_trait]
impl AdminCommand for FixtureAdminCommand {
    async fn create_book(&self, _caller: &UserId, _book: &NewBook) -> Result<Book, Error> {
        Err(not_admin())
    }

    async fn update_book(
        &self,
        _caller: &UserId,
        _book_id: &BookId,
        _book: &NewBook,
    ) -> Result<Book, Error> {
        Err(not_admin())
    }

    async fn delete_book(&self, _caller: &UserId, _book_id: &BookId) -> Result<(), Error> {
        Err(not_admin())
    }
}

/// Fixture query: nobody is an admin without a configured policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminQuery;

#[async_trait]
impl AdminQuery for FixtureAdminQuery {
    async fn stats(&self, _caller: &UserId) -> Result<DashboardStats, Error> {
        Err(not_admin())
    }

    async fn books(
        &self,
        _caller: &UserId,
        _query: Option<SearchQuery>,
    ) -> Result<Vec<Book>, Error> {
        Err(not_admin())
    }

    async fn users(&self, _caller: &UserId) -> Result<Vec<AdminUserSummary>, Error> {
        Err(not_admin())
    }

    async fn user_books(
        &self,
        _caller: &UserId,
        _user: &UserId,
    ) -> Result<Vec<LibraryEntry>, Error> {
        Err(not_admin())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixtures_forbid_everyone() {
        let caller = UserId::random();
        let err = FixtureAdminQuery
            .stats(&caller)
            .await
            .expect_err("not an admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        let err = FixtureAdminCommand
            .delete_book(&caller, &BookId::random())
            .await
            .expect_err("not an admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
