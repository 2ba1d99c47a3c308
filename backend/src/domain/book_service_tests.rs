//! Tests for the book lookup service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    BookCatalogSourceError, MockBookCatalogSource, MockBookRepository, fixture_book,
};
use crate::domain::{
    Book, BookId, BookSource, CatalogVolume, ErrorCode, ExternalVolumeId, LOCAL_RESULT_THRESHOLD,
};
use rstest::rstest;

fn volume(id: &str, isbn: Option<&str>) -> CatalogVolume {
    CatalogVolume {
        volume_id: ExternalVolumeId::new(id).expect("volume id"),
        title: format!("Volume {id}"),
        authors: Vec::new(),
        description: None,
        thumbnail: None,
        page_count: None,
        publisher: None,
        published_date: None,
        isbn: isbn.map(str::to_owned),
    }
}

fn local_books(count: usize) -> Vec<Book> {
    (0..count)
        .map(|_| fixture_book(Some(BookId::random())))
        .collect()
}

fn make_service(
    books: MockBookRepository,
    catalog: MockBookCatalogSource,
) -> BookService<MockBookRepository, MockBookCatalogSource> {
    BookService::new(Arc::new(books), Arc::new(catalog))
}

#[tokio::test]
async fn local_book_is_served_from_repository() {
    let book = fixture_book(None);
    let id = book.id;
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(book)));
    let mut catalog = MockBookCatalogSource::new();
    catalog.expect_fetch().times(0);

    let summary = make_service(books, catalog)
        .book(&BookRef::Local(id), Locale::Tr)
        .await
        .expect("book found");
    assert_eq!(summary.source, BookSource::Local);
    assert_eq!(summary.id, id.to_string());
}

#[tokio::test]
async fn missing_local_book_is_not_found() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let err = make_service(books, MockBookCatalogSource::new())
        .book(&BookRef::Local(BookId::random()), Locale::Tr)
        .await
        .expect_err("missing book");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Locale::Tr, "Bilinmeyen Yazar")]
#[case(Locale::En, "Unknown Author")]
#[tokio::test]
async fn external_book_uses_localized_author_placeholder(
    #[case] locale: Locale,
    #[case] expected: &str,
) {
    let mut catalog = MockBookCatalogSource::new();
    catalog
        .expect_fetch()
        .times(1)
        .return_once(|_| Ok(Some(volume("abc123", None))));

    let book_ref = BookRef::External(ExternalVolumeId::new("abc123").expect("id"));
    let summary = make_service(MockBookRepository::new(), catalog)
        .book(&book_ref, locale)
        .await
        .expect("volume found");
    assert_eq!(summary.id, "google_abc123");
    assert_eq!(summary.author, expected);
    assert_eq!(summary.source, BookSource::Google);
}

#[tokio::test]
async fn external_book_reports_catalog_outage() {
    let mut catalog = MockBookCatalogSource::new();
    catalog
        .expect_fetch()
        .times(1)
        .return_once(|_| Err(BookCatalogSourceError::timeout("10s elapsed")));

    let book_ref = BookRef::External(ExternalVolumeId::new("abc123").expect("id"));
    let err = make_service(MockBookRepository::new(), catalog)
        .book(&book_ref, Locale::Tr)
        .await
        .expect_err("catalog down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn short_queries_touch_nothing() {
    let mut books = MockBookRepository::new();
    books.expect_search_titles().times(0);
    let mut catalog = MockBookCatalogSource::new();
    catalog.expect_search().times(0);

    let hits = make_service(books, catalog)
        .search("x", Locale::Tr)
        .await
        .expect("short query");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn enough_local_hits_skip_the_catalog() {
    let mut books = MockBookRepository::new();
    books
        .expect_search_titles()
        .withf(|_, limit| *limit == LOCAL_SEARCH_LIMIT)
        .times(1)
        .return_once(|_, _| Ok(local_books(LOCAL_RESULT_THRESHOLD)));
    let mut catalog = MockBookCatalogSource::new();
    catalog.expect_search().times(0);

    let hits = make_service(books, catalog)
        .search("madonna", Locale::Tr)
        .await
        .expect("search succeeds");
    assert_eq!(hits.len(), LOCAL_RESULT_THRESHOLD);
    assert!(hits.iter().all(|hit| hit.source == BookSource::Local));
}

#[tokio::test]
async fn sparse_local_hits_are_topped_up_without_duplicate_isbns() {
    let mut books = MockBookRepository::new();
    books
        .expect_search_titles()
        .times(1)
        .return_once(|_, _| Ok(local_books(1)));
    let mut catalog = MockBookCatalogSource::new();
    catalog
        .expect_search()
        .withf(|_, limit| *limit == CATALOG_RESULT_LIMIT)
        .times(1)
        .return_once(|_, _| {
            Ok(vec![
                volume("dup", Some("978-9753638029")),
                volume("fresh", Some("9780000000001")),
            ])
        });

    let hits = make_service(books, catalog)
        .search("madonna", Locale::Tr)
        .await
        .expect("search succeeds");
    let ids: Vec<_> = hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source, BookSource::Local);
    assert_eq!(ids[1], "google_fresh");
}

#[tokio::test]
async fn catalog_failure_degrades_to_local_results() {
    let mut books = MockBookRepository::new();
    books
        .expect_search_titles()
        .times(1)
        .return_once(|_, _| Ok(local_books(2)));
    let mut catalog = MockBookCatalogSource::new();
    catalog
        .expect_search()
        .times(1)
        .return_once(|_, _| Err(BookCatalogSourceError::rate_limited("429")));

    let hits = make_service(books, catalog)
        .search("madonna", Locale::Tr)
        .await
        .expect("degraded search succeeds");
    assert_eq!(hits.len(), 2);
}
