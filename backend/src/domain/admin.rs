//! Admin access policy and dashboard read models.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityEntry, Book, EmailAddress, Profile};

/// Number of recent activities shown on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: i64 = 5;
/// Number of entries in each dashboard leaderboard.
pub const LEADERBOARD_LIMIT: i64 = 5;
/// Number of entries shown for a single user in the admin panel.
pub const ADMIN_USER_BOOKS_LIMIT: i64 = 10;

/// Set of email addresses allowed to use the admin surface.
///
/// Matching is case-insensitive; malformed configured entries are ignored.
///
/// # Examples
/// ```
/// use shelfmate::domain::{AdminPolicy, EmailAddress};
///
/// let policy = AdminPolicy::from_emails(["Admin@Example.org", "not an email"]);
/// let caller = EmailAddress::new("admin@example.org").unwrap();
/// assert!(policy.is_admin(&caller));
/// assert_eq!(policy.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    emails: HashSet<EmailAddress>,
}

impl AdminPolicy {
    pub fn from_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .filter_map(|raw| match EmailAddress::new(raw.as_ref()) {
                Ok(email) => Some(email),
                Err(error) => {
                    tracing::warn!(entry = raw.as_ref(), %error, "ignoring invalid admin email");
                    None
                }
            })
            .collect();
        Self { emails }
    }

    pub fn is_admin(&self, email: &EmailAddress) -> bool {
        self.emails.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// First instant of the calendar month containing `now`, in UTC.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Headline totals for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub books: i64,
    pub users: i64,
    pub reviews: i64,
    pub favorites: i64,
    pub want_to_read: i64,
    pub reading: i64,
    pub finished: i64,
    pub books_this_month: i64,
    pub users_this_month: i64,
}

/// Book with the number of shelves it appears on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBook {
    pub book: Book,
    pub shelf_count: i64,
}

/// Reader with the number of books on their shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    pub profile: Profile,
    pub book_count: i64,
}

/// Complete dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub totals: DashboardTotals,
    pub recent_activity: Vec<ActivityEntry>,
    pub top_books: Vec<TopBook>,
    pub top_users: Vec<TopUser>,
}

/// Profile row for the admin user list, with shelf statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    pub profile: Profile,
    pub book_count: i64,
    pub rating_count: i64,
    pub favorite_count: i64,
}
