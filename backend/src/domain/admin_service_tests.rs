//! Tests for the admin service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockAccountRepository, MockAdminRepository, MockBookRepository, fixture_book,
};
use crate::domain::{BookDraft, DashboardTotals, EmailAddress, ErrorCode, Profile};
use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::rstest;

const ADMIN_EMAIL: &str = "admin@example.org";

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 17, 15, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn accounts_with(email: &'static str) -> MockAccountRepository {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_by_id().returning(move |id| {
        Ok(Some(Profile::new(
            id.clone(),
            EmailAddress::new(email).expect("email"),
            Utc::now(),
        )))
    });
    accounts
}

fn make_service(
    accounts: MockAccountRepository,
    books: MockBookRepository,
    admin: MockAdminRepository,
) -> AdminService<MockAccountRepository, MockBookRepository, MockAdminRepository> {
    AdminService::new(
        Arc::new(accounts),
        Arc::new(books),
        Arc::new(admin),
        Arc::new(AdminPolicy::from_emails([ADMIN_EMAIL])),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

fn new_book() -> NewBook {
    NewBook::try_from_draft(BookDraft {
        title: Some("Tutunamayanlar".to_owned()),
        author: Some("Oğuz Atay".to_owned()),
        ..BookDraft::default()
    })
    .expect("valid book")
}

#[tokio::test]
async fn non_admins_are_forbidden_everywhere() {
    let caller = UserId::random();
    let mut books = MockBookRepository::new();
    books.expect_insert().times(0);
    books.expect_delete_cascade().times(0);
    let mut admin = MockAdminRepository::new();
    admin.expect_dashboard().times(0);
    admin.expect_list_users().times(0);
    let service = make_service(accounts_with("reader@example.org"), books, admin);

    let create = service.create_book(&caller, &new_book()).await;
    let delete = service.delete_book(&caller, &BookId::random()).await;
    let stats = service.stats(&caller).await;
    let users = service.users(&caller).await;

    assert_eq!(create.err().map(|e| e.code()), Some(ErrorCode::Forbidden));
    assert_eq!(delete.err().map(|e| e.code()), Some(ErrorCode::Forbidden));
    assert_eq!(stats.err().map(|e| e.code()), Some(ErrorCode::Forbidden));
    assert_eq!(users.err().map(|e| e.code()), Some(ErrorCode::Forbidden));
}

#[tokio::test]
async fn vanished_caller_is_unauthorized() {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let err = make_service(accounts, MockBookRepository::new(), MockAdminRepository::new())
        .stats(&UserId::random())
        .await
        .expect_err("stale session");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn stats_count_from_start_of_month() {
    let mut admin = MockAdminRepository::new();
    admin
        .expect_dashboard()
        .withf(|since| *since == month_start(fixture_now()))
        .times(1)
        .return_once(|_| {
            Ok(DashboardStats {
                totals: DashboardTotals {
                    books: 3,
                    ..DashboardTotals::default()
                },
                recent_activity: Vec::new(),
                top_books: Vec::new(),
                top_users: Vec::new(),
            })
        });

    let stats = make_service(accounts_with(ADMIN_EMAIL), MockBookRepository::new(), admin)
        .stats(&UserId::random())
        .await
        .expect("stats");
    assert_eq!(stats.totals.books, 3);
}

#[tokio::test]
async fn admin_can_create_books() {
    let mut books = MockBookRepository::new();
    let stored = fixture_book(None);
    books
        .expect_insert()
        .withf(|book: &NewBook| book.title == "Tutunamayanlar")
        .times(1)
        .return_once(move |_| Ok(stored));

    let created = make_service(accounts_with(ADMIN_EMAIL), books, MockAdminRepository::new())
        .create_book(&UserId::random(), &new_book())
        .await
        .expect("created");
    assert_eq!(created.author, "Sabahattin Ali");
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_books(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
    let mut books = MockBookRepository::new();
    books
        .expect_delete_cascade()
        .times(1)
        .return_once(move |_| Ok(existed));

    let result = make_service(accounts_with(ADMIN_EMAIL), books, MockAdminRepository::new())
        .delete_book(&UserId::random(), &BookId::random())
        .await;
    assert_eq!(result.err().map(|e| e.code()), expected);
}

#[tokio::test]
async fn update_of_missing_book_is_not_found() {
    let mut books = MockBookRepository::new();
    books.expect_update().times(1).return_once(|_, _| Ok(None));

    let err = make_service(accounts_with(ADMIN_EMAIL), books, MockAdminRepository::new())
        .update_book(&UserId::random(), &BookId::random(), &new_book())
        .await
        .expect_err("missing book");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn user_books_are_capped() {
    let mut admin = MockAdminRepository::new();
    admin
        .expect_recent_user_books()
        .withf(|_, limit| *limit == ADMIN_USER_BOOKS_LIMIT)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let entries = make_service(accounts_with(ADMIN_EMAIL), MockBookRepository::new(), admin)
        .user_books(&UserId::random(), &UserId::random())
        .await
        .expect("user books");
    assert!(entries.is_empty());
}
