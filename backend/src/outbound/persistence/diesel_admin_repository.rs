//! PostgreSQL-backed `AdminRepository` computing dashboard aggregates.
//!
//! Leaderboards group on the foreign key first and hydrate the winning rows
//! in a second query, keeping every `GROUP BY` on a single column.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count, count_star};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{AdminRepository, AdminRepositoryError};
use crate::domain::{
    ActivityEntry, AdminUserSummary, Book, DashboardStats, DashboardTotals, LEADERBOARD_LIMIT,
    LibraryEntry, Profile, RECENT_ACTIVITY_LIMIT, ReadingStatus, TopBook, TopUser, UserBook,
    UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookRow, InvalidRow, ProfileRow, UserBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::{books, profiles, user_books};

/// Diesel-backed implementation of the [`AdminRepository`] port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdminRepositoryError {
    map_basic_pool_error(error, |message| AdminRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> AdminRepositoryError {
    map_basic_diesel_error(
        error,
        AdminRepositoryError::query,
        AdminRepositoryError::connection,
    )
}

fn map_invalid_row(error: InvalidRow) -> AdminRepositoryError {
    AdminRepositoryError::query(error.to_string())
}

/// Fold per-status counts into the dashboard totals.
fn apply_status_counts(totals: &mut DashboardTotals, counts: &[(String, i64)]) {
    for (status, n) in counts {
        match status.parse::<ReadingStatus>() {
            Ok(ReadingStatus::WantToRead) => totals.want_to_read = *n,
            Ok(ReadingStatus::Reading) => totals.reading = *n,
            Ok(ReadingStatus::Finished) => totals.finished = *n,
            Err(_) => tracing::warn!(status, "ignoring unknown stored status in dashboard"),
        }
    }
}

/// Reorder hydrated rows to follow the ranking produced by a grouped query.
fn in_rank_order<T>(
    ranking: &[(Uuid, i64)],
    mut rows: HashMap<Uuid, T>,
) -> Vec<(T, i64)> {
    ranking
        .iter()
        .filter_map(|(id, n)| rows.remove(id).map(|row| (row, *n)))
        .collect()
}

async fn load_totals(
    conn: &mut AsyncPgConnection,
    month_start: DateTime<Utc>,
) -> Result<DashboardTotals, DieselError> {
    let mut totals = DashboardTotals {
        books: books::table.count().get_result(conn).await?,
        users: profiles::table.count().get_result(conn).await?,
        reviews: user_books::table
            .filter(user_books::rating.is_not_null())
            .count()
            .get_result(conn)
            .await?,
        favorites: user_books::table
            .filter(user_books::is_favorite.eq(true))
            .count()
            .get_result(conn)
            .await?,
        books_this_month: books::table
            .filter(books::created_at.ge(month_start))
            .count()
            .get_result(conn)
            .await?,
        users_this_month: profiles::table
            .filter(profiles::created_at.ge(month_start))
            .count()
            .get_result(conn)
            .await?,
        ..DashboardTotals::default()
    };
    let by_status: Vec<(String, i64)> = user_books::table
        .group_by(user_books::status)
        .select((user_books::status, count_star()))
        .load(conn)
        .await?;
    apply_status_counts(&mut totals, &by_status);
    Ok(totals)
}

async fn load_recent_activity(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<(UserBookRow, BookRow, ProfileRow)>, DieselError> {
    user_books::table
        .inner_join(books::table)
        .inner_join(profiles::table)
        .order(user_books::updated_at.desc())
        .limit(RECENT_ACTIVITY_LIMIT)
        .select((
            UserBookRow::as_select(),
            BookRow::as_select(),
            ProfileRow::as_select(),
        ))
        .load(conn)
        .await
}

async fn load_top_books(conn: &mut AsyncPgConnection) -> Result<Vec<(BookRow, i64)>, DieselError> {
    let ranking: Vec<(Uuid, i64)> = user_books::table
        .group_by(user_books::book_id)
        .select((user_books::book_id, count_star()))
        .order((count_star().desc(), user_books::book_id.asc()))
        .limit(LEADERBOARD_LIMIT)
        .load(conn)
        .await?;
    let ids: Vec<Uuid> = ranking.iter().map(|(id, _)| *id).collect();
    let rows: Vec<BookRow> = books::table
        .filter(books::id.eq_any(&ids))
        .select(BookRow::as_select())
        .load(conn)
        .await?;
    Ok(in_rank_order(
        &ranking,
        rows.into_iter().map(|row| (row.id, row)).collect(),
    ))
}

async fn load_top_users(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<(ProfileRow, i64)>, DieselError> {
    let ranking: Vec<(Uuid, i64)> = user_books::table
        .group_by(user_books::user_id)
        .select((user_books::user_id, count_star()))
        .order((count_star().desc(), user_books::user_id.asc()))
        .limit(LEADERBOARD_LIMIT)
        .load(conn)
        .await?;
    let ids: Vec<Uuid> = ranking.iter().map(|(id, _)| *id).collect();
    let rows: Vec<ProfileRow> = profiles::table
        .filter(profiles::id.eq_any(&ids))
        .select(ProfileRow::as_select())
        .load(conn)
        .await?;
    Ok(in_rank_order(
        &ranking,
        rows.into_iter().map(|row| (row.id, row)).collect(),
    ))
}

fn to_activity(
    (entry, book, user): (UserBookRow, BookRow, ProfileRow),
) -> Result<ActivityEntry, InvalidRow> {
    Ok(ActivityEntry {
        entry: UserBook::try_from(entry)?,
        book: Book::from(book),
        user: Profile::try_from(user)?,
    })
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn dashboard(
        &self,
        month_start: DateTime<Utc>,
    ) -> Result<DashboardStats, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let totals = load_totals(&mut conn, month_start)
            .await
            .map_err(map_diesel_error)?;
        let recent = load_recent_activity(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let top_books = load_top_books(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let top_users = load_top_users(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(DashboardStats {
            totals,
            recent_activity: recent
                .into_iter()
                .map(to_activity)
                .collect::<Result<_, _>>()
                .map_err(map_invalid_row)?,
            top_books: top_books
                .into_iter()
                .map(|(row, shelf_count)| TopBook {
                    book: Book::from(row),
                    shelf_count,
                })
                .collect(),
            top_users: top_users
                .into_iter()
                .map(|(row, book_count)| {
                    Ok(TopUser {
                        profile: Profile::try_from(row)?,
                        book_count,
                    })
                })
                .collect::<Result<_, InvalidRow>>()
                .map_err(map_invalid_row)?,
        })
    }

    async fn list_users(&self) -> Result<Vec<AdminUserSummary>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileRow> = profiles::table
            .order(profiles::created_at.desc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let shelf_counts: HashMap<Uuid, (i64, i64)> = user_books::table
            .group_by(user_books::user_id)
            .select((user_books::user_id, count_star(), count(user_books::rating)))
            .load::<(Uuid, i64, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|(id, books, ratings)| (id, (books, ratings)))
            .collect();
        let favorite_counts: HashMap<Uuid, i64> = user_books::table
            .filter(user_books::is_favorite.eq(true))
            .group_by(user_books::user_id)
            .select((user_books::user_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let (book_count, rating_count) =
                    shelf_counts.get(&row.id).copied().unwrap_or_default();
                let favorite_count = favorite_counts.get(&row.id).copied().unwrap_or_default();
                Ok(AdminUserSummary {
                    profile: Profile::try_from(row).map_err(map_invalid_row)?,
                    book_count,
                    rating_count,
                    favorite_count,
                })
            })
            .collect()
    }

    async fn recent_user_books(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<LibraryEntry>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(UserBookRow, BookRow)> = user_books::table
            .inner_join(books::table)
            .filter(user_books::user_id.eq(user.as_uuid()))
            .order(user_books::created_at.desc())
            .limit(limit)
            .select((UserBookRow::as_select(), BookRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(entry, book)| {
                Ok(LibraryEntry {
                    entry: UserBook::try_from(entry).map_err(map_invalid_row)?,
                    book: Book::from(book),
                })
            })
            .collect()
    }
}
