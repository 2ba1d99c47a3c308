//! PostgreSQL-backed `LibraryRepository` over `user_books` joined to `books`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LibraryRepository, LibraryRepositoryError};
use crate::domain::{
    AddOutcome, Book, BookId, LibraryEntry, ReadingStatus, ReviewUpdate, UserBook, UserId,
};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{BookRow, NewUserBookRow, UserBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::{books, user_books};

/// Diesel-backed implementation of the [`LibraryRepository`] port.
#[derive(Clone)]
pub struct DieselLibraryRepository {
    pool: DbPool,
}

impl DieselLibraryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LibraryRepositoryError {
    map_basic_pool_error(error, |message| LibraryRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> LibraryRepositoryError {
    map_basic_diesel_error(
        error,
        LibraryRepositoryError::query,
        LibraryRepositoryError::connection,
    )
}

fn to_entry(
    (entry, book): (UserBookRow, BookRow),
) -> Result<LibraryEntry, LibraryRepositoryError> {
    let entry = UserBook::try_from(entry)
        .map_err(|err| LibraryRepositoryError::query(err.to_string()))?;
    Ok(LibraryEntry {
        entry,
        book: Book::from(book),
    })
}

async fn load_entry(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    book_id: Uuid,
) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
    user_books::table
        .inner_join(books::table)
        .filter(user_books::user_id.eq(user_id))
        .filter(user_books::book_id.eq(book_id))
        .select((UserBookRow::as_select(), BookRow::as_select()))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(to_entry)
        .transpose()
}

/// Reload the caller's entry when an update touched a row.
async fn reload_if_changed(
    conn: &mut AsyncPgConnection,
    changed: usize,
    user_id: Uuid,
    book_id: Uuid,
) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
    if changed == 0 {
        return Ok(None);
    }
    load_entry(conn, user_id, book_id).await
}

#[async_trait]
impl LibraryRepository for DieselLibraryRepository {
    async fn find_entry(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_entry(&mut conn, *user_id.as_uuid(), *book_id.as_uuid()).await
    }

    async fn add(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<AddOutcome, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserBookRow {
            id: Uuid::new_v4(),
            user_id: *user_id.as_uuid(),
            book_id: *book_id.as_uuid(),
            status: ReadingStatus::WantToRead.as_str(),
        };
        let inserted = diesel::insert_into(user_books::table)
            .values(&row)
            .on_conflict((user_books::user_id, user_books::book_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    LibraryRepositoryError::missing_book(book_id.to_string())
                } else {
                    map_diesel_error(err)
                }
            })?;

        let entry = load_entry(&mut conn, row.user_id, row.book_id)
            .await?
            .ok_or_else(|| LibraryRepositoryError::missing_book(book_id.to_string()))?;
        Ok(if inserted == 0 {
            AddOutcome::AlreadyShelved(entry)
        } else {
            AddOutcome::Created(entry)
        })
    }

    async fn list(
        &self,
        user_id: &UserId,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = user_books::table
            .inner_join(books::table)
            .filter(user_books::user_id.eq(user_id.as_uuid()))
            .order(user_books::created_at.desc())
            .select((UserBookRow::as_select(), BookRow::as_select()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(user_books::status.eq(status.as_str()));
        }
        let rows: Vec<(UserBookRow, BookRow)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(to_entry).collect()
    }

    async fn recent(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(UserBookRow, BookRow)> = user_books::table
            .inner_join(books::table)
            .filter(user_books::user_id.eq(user_id.as_uuid()))
            .order(user_books::updated_at.desc())
            .limit(limit)
            .select((UserBookRow::as_select(), BookRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_entry).collect()
    }

    async fn set_status(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        status: ReadingStatus,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, book_id) = (*user_id.as_uuid(), *book_id.as_uuid());
        let changed = diesel::update(
            user_books::table
                .filter(user_books::user_id.eq(user_id))
                .filter(user_books::book_id.eq(book_id)),
        )
        .set((
            user_books::status.eq(status.as_str()),
            user_books::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        reload_if_changed(&mut conn, changed, user_id, book_id).await
    }

    async fn remove(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<bool, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            user_books::table
                .filter(user_books::user_id.eq(user_id.as_uuid()))
                .filter(user_books::book_id.eq(book_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn set_review(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        review: &ReviewUpdate,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, book_id) = (*user_id.as_uuid(), *book_id.as_uuid());
        let changed = diesel::update(
            user_books::table
                .filter(user_books::user_id.eq(user_id))
                .filter(user_books::book_id.eq(book_id)),
        )
        .set((
            user_books::rating.eq(review.rating.map(i16::from)),
            user_books::notes.eq(review.notes.as_deref()),
            user_books::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        reload_if_changed(&mut conn, changed, user_id, book_id).await
    }

    async fn set_favorite(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        is_favorite: bool,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, book_id) = (*user_id.as_uuid(), *book_id.as_uuid());
        let changed = diesel::update(
            user_books::table
                .filter(user_books::user_id.eq(user_id))
                .filter(user_books::book_id.eq(book_id)),
        )
        .set((
            user_books::is_favorite.eq(is_favorite),
            user_books::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        reload_if_changed(&mut conn, changed, user_id, book_id).await
    }
}
