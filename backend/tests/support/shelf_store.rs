//! In-memory book table and reader shelves.
//!
//! [`InMemoryShelf`] implements the book and library repositories over one
//! store, applying the same rules as the PostgreSQL adapters: one entry per
//! reader and book, new entries start as `want_to_read`, and imported
//! volumes are matched by ISBN or normalised title and author.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use shelfmate::domain::ports::{
    BookRepository, BookRepositoryError, LibraryRepository, LibraryRepositoryError,
};
use shelfmate::domain::{
    AddOutcome, Book, BookId, LibraryEntry, NewBook, ReadingStatus, ReviewUpdate, SearchQuery,
    UserBook, UserId, normalize_title,
};

#[derive(Default)]
struct Store {
    books: Vec<Book>,
    entries: Vec<UserBook>,
}

/// In-memory stand-in for the `books` and `user_books` tables.
#[derive(Clone, Default)]
pub struct InMemoryShelf {
    store: Arc<Mutex<Store>>,
}

impl InMemoryShelf {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("store poisoned")
    }

    /// Insert a book directly, as an admin would.
    pub fn add_book(&self, title: &str, author: &str) -> Book {
        let book = stored_book(
            BookId::random(),
            &NewBook {
                title: title.to_owned(),
                author: author.to_owned(),
                cover_url: None,
                isbn: None,
                publisher: None,
                published_date: None,
                page_count: None,
                description: None,
            },
        );
        self.lock().books.push(book.clone());
        book
    }

    /// Every shelf row owned by `user`, regardless of status.
    pub fn rows_for(&self, user: &UserId) -> Vec<UserBook> {
        self.lock()
            .entries
            .iter()
            .filter(|entry| &entry.user_id == user)
            .cloned()
            .collect()
    }

    pub fn book_count(&self) -> usize {
        self.lock().books.len()
    }

    fn joined(store: &Store, entry: &UserBook) -> Option<LibraryEntry> {
        store
            .books
            .iter()
            .find(|book| book.id == entry.book_id)
            .map(|book| LibraryEntry {
                entry: entry.clone(),
                book: book.clone(),
            })
    }

    fn update_entry(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        apply: impl FnOnce(&mut UserBook),
    ) -> Option<LibraryEntry> {
        let mut store = self.lock();
        let entry = store
            .entries
            .iter_mut()
            .find(|entry| &entry.user_id == user_id && &entry.book_id == book_id)?;
        apply(entry);
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        Self::joined(&store, &updated)
    }
}

fn stored_book(id: BookId, book: &NewBook) -> Book {
    Book {
        id,
        title: book.title.clone(),
        author: book.author.clone(),
        cover_url: book.cover_url.clone(),
        isbn: book.isbn.clone(),
        publisher: book.publisher.clone(),
        published_date: book.published_date.clone(),
        page_count: book.page_count,
        description: book.description.clone(),
        created_at: Utc::now(),
    }
}

fn same_book(existing: &Book, candidate: &NewBook) -> bool {
    match candidate.isbn.as_deref() {
        Some(isbn) => existing.isbn.as_deref() == Some(isbn),
        None => {
            normalize_title(&existing.title) == candidate.normalized_title()
                && existing.author.eq_ignore_ascii_case(&candidate.author)
        }
    }
}

#[async_trait]
impl BookRepository for InMemoryShelf {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self.lock().books.iter().find(|book| &book.id == id).cloned())
    }

    async fn search_titles(
        &self,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let needle = query.as_str().to_lowercase();
        let limit = usize::try_from(limit).unwrap_or_default();
        Ok(self
            .lock()
            .books
            .iter()
            .rev()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_or_insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError> {
        let mut store = self.lock();
        if let Some(existing) = store.books.iter().find(|row| same_book(row, book)) {
            return Ok(existing.clone());
        }
        let inserted = stored_book(BookId::random(), book);
        store.books.push(inserted.clone());
        Ok(inserted)
    }

    async fn insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError> {
        let inserted = stored_book(BookId::random(), book);
        self.lock().books.push(inserted.clone());
        Ok(inserted)
    }

    async fn update(
        &self,
        id: &BookId,
        book: &NewBook,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut store = self.lock();
        let Some(row) = store.books.iter_mut().find(|row| &row.id == id) else {
            return Ok(None);
        };
        *row = Book {
            created_at: row.created_at,
            ..stored_book(*id, book)
        };
        Ok(Some(row.clone()))
    }

    async fn delete_cascade(&self, id: &BookId) -> Result<bool, BookRepositoryError> {
        let mut store = self.lock();
        let before = store.books.len();
        store.books.retain(|book| &book.id != id);
        store.entries.retain(|entry| &entry.book_id != id);
        Ok(store.books.len() < before)
    }

    async fn list(&self, query: Option<SearchQuery>) -> Result<Vec<Book>, BookRepositoryError> {
        let needle = query.map(|q| q.as_str().to_lowercase());
        Ok(self
            .lock()
            .books
            .iter()
            .rev()
            .filter(|book| {
                needle.as_deref().is_none_or(|needle| {
                    book.title.to_lowercase().contains(needle)
                        || book.author.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LibraryRepository for InMemoryShelf {
    async fn find_entry(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        let store = self.lock();
        Ok(store
            .entries
            .iter()
            .find(|entry| &entry.user_id == user_id && &entry.book_id == book_id)
            .and_then(|entry| Self::joined(&store, entry)))
    }

    async fn add(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<AddOutcome, LibraryRepositoryError> {
        let mut store = self.lock();
        if !store.books.iter().any(|book| &book.id == book_id) {
            return Err(LibraryRepositoryError::missing_book(book_id.to_string()));
        }
        if let Some(existing) = store
            .entries
            .iter()
            .find(|entry| &entry.user_id == user_id && &entry.book_id == book_id)
            .and_then(|entry| Self::joined(&store, entry))
        {
            return Ok(AddOutcome::AlreadyShelved(existing));
        }
        let now = Utc::now();
        let entry = UserBook {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            book_id: *book_id,
            status: ReadingStatus::WantToRead,
            rating: None,
            notes: None,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        };
        store.entries.push(entry.clone());
        Self::joined(&store, &entry)
            .map(AddOutcome::Created)
            .ok_or_else(|| LibraryRepositoryError::missing_book(book_id.to_string()))
    }

    async fn list(
        &self,
        user_id: &UserId,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        let store = self.lock();
        Ok(store
            .entries
            .iter()
            .rev()
            .filter(|entry| &entry.user_id == user_id)
            .filter(|entry| status.is_none_or(|wanted| entry.status == wanted))
            .filter_map(|entry| Self::joined(&store, entry))
            .collect())
    }

    async fn recent(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        let mut entries = LibraryRepository::list(self, user_id, None).await?;
        entries.sort_by(|a, b| b.entry.updated_at.cmp(&a.entry.updated_at));
        entries.truncate(usize::try_from(limit).unwrap_or_default());
        Ok(entries)
    }

    async fn set_status(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        status: ReadingStatus,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(self.update_entry(user_id, book_id, |entry| entry.status = status))
    }

    async fn remove(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<bool, LibraryRepositoryError> {
        let mut store = self.lock();
        let before = store.entries.len();
        store
            .entries
            .retain(|entry| !(&entry.user_id == user_id && &entry.book_id == book_id));
        Ok(store.entries.len() < before)
    }

    async fn set_review(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        review: &ReviewUpdate,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(self.update_entry(user_id, book_id, |entry| {
            entry.rating = review.rating;
            entry.notes.clone_from(&review.notes);
        }))
    }

    async fn set_favorite(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        is_favorite: bool,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(self.update_entry(user_id, book_id, |entry| entry.is_favorite = is_favorite))
    }
}
