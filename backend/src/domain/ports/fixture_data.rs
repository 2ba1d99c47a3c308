//! Canned records shared by the fixture port implementations.
//!
//! Fixtures stand in for persistence when no database is configured and keep
//! handler tests deterministic.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    Book, BookId, EmailAddress, Error, LibraryEntry, Profile, ReadingStatus, UserBook, UserId,
};

/// Email accepted by the fixture account command.
pub const FIXTURE_EMAIL: &str = "ada@example.org";
/// Password accepted by the fixture account command.
pub const FIXTURE_PASSWORD: &str = "password";
/// Identifier of the fixture reader.
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Identifier of the fixture book.
pub const FIXTURE_BOOK_ID: &str = "9b2f6a0e-4c1d-4f2e-8a57-3c6d1e0b7a42";

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Profile of the fixture reader, using `id` when given.
pub fn fixture_profile(id: Option<&UserId>) -> Result<Profile, Error> {
    let id = match id {
        Some(id) => id.clone(),
        None => UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?,
    };
    let email = EmailAddress::new(FIXTURE_EMAIL)
        .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
    let mut profile = Profile::new(id, email, fixture_timestamp());
    profile.full_name = Some("Ada Lovelace".to_owned());
    Ok(profile)
}

/// The fixture book, using `id` when given.
pub fn fixture_book(id: Option<BookId>) -> Book {
    let id = id.unwrap_or_else(|| {
        BookId::from_uuid(Uuid::parse_str(FIXTURE_BOOK_ID).unwrap_or_else(|_| Uuid::nil()))
    });
    Book {
        id,
        title: "Kürk Mantolu Madonna".to_owned(),
        author: "Sabahattin Ali".to_owned(),
        cover_url: None,
        isbn: Some("9789753638029".to_owned()),
        publisher: Some("Yapı Kredi Yayınları".to_owned()),
        published_date: Some("1943".to_owned()),
        page_count: Some(160),
        description: None,
        created_at: fixture_timestamp(),
    }
}

/// Shelf entry for `user_id` holding `book`.
pub fn fixture_entry(user_id: &UserId, book: Book, status: ReadingStatus) -> LibraryEntry {
    let created_at = fixture_timestamp();
    LibraryEntry {
        entry: UserBook {
            id: Uuid::nil(),
            user_id: user_id.clone(),
            book_id: book.id,
            status,
            rating: None,
            notes: None,
            is_favorite: false,
            created_at,
            updated_at: created_at,
        },
        book,
    }
}
