//! Admin dashboard and catalogue maintenance.
//!
//! Every operation re-checks the caller against the configured
//! [`AdminPolicy`] before touching a repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{AccountRepository, AdminCommand, AdminQuery, AdminRepository, BookRepository};
use crate::domain::service_errors::{map_account_error, map_admin_error, map_book_error};
use crate::domain::{
    ADMIN_USER_BOOKS_LIMIT, AdminPolicy, AdminUserSummary, Book, BookId, DashboardStats, Error,
    LibraryEntry, NewBook, SearchQuery, UserId, month_start,
};

/// Admin service implementing [`AdminCommand`] and [`AdminQuery`].
#[derive(Clone)]
pub struct AdminService<A, B, M> {
    accounts: Arc<A>,
    books: Arc<B>,
    admin: Arc<M>,
    policy: Arc<AdminPolicy>,
    clock: Arc<dyn Clock>,
}

impl<A, B, M> AdminService<A, B, M> {
    pub fn new(
        accounts: Arc<A>,
        books: Arc<B>,
        admin: Arc<M>,
        policy: Arc<AdminPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            books,
            admin,
            policy,
            clock,
        }
    }
}

impl<A, B, M> AdminService<A, B, M>
where
    A: AccountRepository,
    B: BookRepository,
    M: AdminRepository,
{
    async fn require_admin(&self, caller: &UserId) -> Result<(), Error> {
        let profile = self
            .accounts
            .find_by_id(caller)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        if self.policy.is_admin(&profile.email) {
            Ok(())
        } else {
            warn!(user_id = %caller, "admin operation refused");
            Err(Error::forbidden("admin access required"))
        }
    }
}

#[async_trait]
impl<A, B, M> AdminCommand for AdminService<A, B, M>
where
    A: AccountRepository,
    B: BookRepository,
    M: AdminRepository,
{
    async fn create_book(&self, caller: &UserId, book: &NewBook) -> Result<Book, Error> {
        self.require_admin(caller).await?;
        let created = self.books.insert(book).await.map_err(map_book_error)?;
        info!(book_id = %created.id, admin = %caller, "book created");
        Ok(created)
    }

    async fn update_book(
        &self,
        caller: &UserId,
        book_id: &BookId,
        book: &NewBook,
    ) -> Result<Book, Error> {
        self.require_admin(caller).await?;
        self.books
            .update(book_id, book)
            .await
            .map_err(map_book_error)?
            .ok_or_else(|| Error::not_found("book not found"))
    }

    async fn delete_book(&self, caller: &UserId, book_id: &BookId) -> Result<(), Error> {
        self.require_admin(caller).await?;
        let deleted = self
            .books
            .delete_cascade(book_id)
            .await
            .map_err(map_book_error)?;
        if !deleted {
            return Err(Error::not_found("book not found"));
        }
        info!(%book_id, admin = %caller, "book deleted");
        Ok(())
    }
}

#[async_trait]
impl<A, B, M> AdminQuery for AdminService<A, B, M>
where
    A: AccountRepository,
    B: BookRepository,
    M: AdminRepository,
{
    async fn stats(&self, caller: &UserId) -> Result<DashboardStats, Error> {
        self.require_admin(caller).await?;
        self.admin
            .dashboard(month_start(self.clock.utc()))
            .await
            .map_err(map_admin_error)
    }

    async fn books(&self, caller: &UserId, query: Option<SearchQuery>) -> Result<Vec<Book>, Error> {
        self.require_admin(caller).await?;
        self.books.list(query).await.map_err(map_book_error)
    }

    async fn users(&self, caller: &UserId) -> Result<Vec<AdminUserSummary>, Error> {
        self.require_admin(caller).await?;
        self.admin.list_users().await.map_err(map_admin_error)
    }

    async fn user_books(
        &self,
        caller: &UserId,
        user: &UserId,
    ) -> Result<Vec<LibraryEntry>, Error> {
        self.require_admin(caller).await?;
        self.admin
            .recent_user_books(user, ADMIN_USER_BOOKS_LIMIT)
            .await
            .map_err(map_admin_error)
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
