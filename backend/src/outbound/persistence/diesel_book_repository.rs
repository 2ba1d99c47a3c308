//! PostgreSQL-backed `BookRepository` over the `books` table.
//!
//! Catalog imports deduplicate on ISBN first, then on normalised title plus
//! author, inside one transaction so concurrent imports converge on a row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookId, NewBook, SearchQuery};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookChangeset, BookRow, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::{book_recommendations, books, user_books};

/// Diesel-backed implementation of the [`BookRepository`] port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookRepositoryError {
    map_basic_pool_error(error, |message| BookRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> BookRepositoryError {
    map_basic_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

async fn find_duplicate(
    conn: &mut AsyncPgConnection,
    book: &NewBook,
) -> Result<Option<BookRow>, DieselError> {
    if let Some(isbn) = book.isbn.as_deref() {
        let by_isbn = books::table
            .filter(books::isbn.eq(isbn))
            .select(BookRow::as_select())
            .first(conn)
            .await
            .optional()?;
        if by_isbn.is_some() {
            return Ok(by_isbn);
        }
    }

    books::table
        .filter(books::normalized_title.eq(book.normalized_title()))
        .filter(books::author.eq(&book.author))
        .order(books::created_at.asc())
        .select(BookRow::as_select())
        .first(conn)
        .await
        .optional()
}

async fn insert_row(conn: &mut AsyncPgConnection, book: &NewBook) -> Result<BookRow, DieselError> {
    diesel::insert_into(books::table)
        .values(NewBookRow::from_domain(Uuid::new_v4(), book))
        .returning(BookRow::as_returning())
        .get_result(conn)
        .await
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = books::table
            .find(id.as_uuid())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Book::from))
    }

    async fn search_titles(
        &self,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookRow> = books::table
            .filter(books::title.ilike(query.like_pattern()))
            .order((books::title.asc(), books::created_at.asc()))
            .limit(limit)
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_or_insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    if let Some(existing) = find_duplicate(conn, book).await? {
                        debug!(book_id = %existing.id, "catalog volume matched existing book");
                        return Ok(existing);
                    }
                    insert_row(conn, book).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(Book::from(row))
    }

    async fn insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = insert_row(&mut conn, book)
            .await
            .map_err(map_diesel_error)?;
        Ok(Book::from(row))
    }

    async fn update(
        &self,
        id: &BookId,
        book: &NewBook,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(books::table.find(id.as_uuid()))
            .set(BookChangeset::from(book))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Book::from))
    }

    async fn delete_cascade(&self, id: &BookId) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let book_id = *id.as_uuid();
        let deleted = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let shelved =
                        diesel::delete(user_books::table.filter(user_books::book_id.eq(book_id)))
                            .execute(conn)
                            .await?;
                    let recommended = diesel::delete(
                        book_recommendations::table
                            .filter(book_recommendations::book_id.eq(book_id)),
                    )
                    .execute(conn)
                    .await?;
                    let removed = diesel::delete(books::table.find(book_id))
                        .execute(conn)
                        .await?;
                    debug!(%book_id, shelved, recommended, removed, "book delete cascaded");
                    Ok(removed > 0)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted)
    }

    async fn list(&self, query: Option<SearchQuery>) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut statement = books::table
            .order(books::created_at.desc())
            .select(BookRow::as_select())
            .into_boxed();
        if let Some(query) = query {
            let pattern = query.like_pattern();
            statement = statement.filter(
                books::title
                    .ilike(pattern.clone())
                    .or(books::author.ilike(pattern)),
            );
        }
        let rows: Vec<BookRow> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn diesel_not_found_is_a_query_error() {
        let err = map_diesel_error(DieselError::NotFound);
        assert!(matches!(err, BookRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_timeouts_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(err.to_string().contains("timed out"));
    }
}
