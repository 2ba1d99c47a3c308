//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `*Source`) describe what the domain needs
//! from persistence and the book catalog. Driving ports (`*Command`,
//! `*Query`) are what inbound adapters call. Driving ports and the catalog
//! source have `Fixture*` implementations for running without
//! infrastructure.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_repository;
mod admin_command;
mod admin_repository;
mod book_catalog_source;
mod book_query;
mod book_repository;
mod fixture_data;
mod friendship_command;
mod friendship_query;
mod friendship_repository;
mod library_command;
mod library_query;
mod library_repository;
mod notification_command;
mod notification_repository;
mod profile_query;
mod recommendation_command;
mod recommendation_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, FixtureAccountCommand};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials,
};
#[cfg(test)]
pub use admin_command::{MockAdminCommand, MockAdminQuery};
pub use admin_command::{AdminCommand, AdminQuery, FixtureAdminCommand, FixtureAdminQuery};
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminRepositoryError};
#[cfg(test)]
pub use book_catalog_source::MockBookCatalogSource;
pub use book_catalog_source::{
    BookCatalogSource, BookCatalogSourceError, FixtureBookCatalogSource,
};
#[cfg(test)]
pub use book_query::MockBookQuery;
pub use book_query::{BookQuery, FixtureBookQuery};
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError};
pub use fixture_data::{
    FIXTURE_BOOK_ID, FIXTURE_EMAIL, FIXTURE_PASSWORD, FIXTURE_USER_ID, fixture_book,
    fixture_entry, fixture_profile,
};
#[cfg(test)]
pub use friendship_command::MockFriendshipCommand;
pub use friendship_command::{FixtureFriendshipCommand, FriendshipCommand};
#[cfg(test)]
pub use friendship_query::MockFriendshipQuery;
pub use friendship_query::{FixtureFriendshipQuery, FriendshipQuery};
#[cfg(test)]
pub use friendship_repository::MockFriendshipRepository;
pub use friendship_repository::{FriendshipRepository, FriendshipRepositoryError};
#[cfg(test)]
pub use library_command::MockLibraryCommand;
pub use library_command::{FixtureLibraryCommand, LibraryCommand, StatusChangeOutcome};
#[cfg(test)]
pub use library_query::MockLibraryQuery;
pub use library_query::{FixtureLibraryQuery, LibraryQuery};
#[cfg(test)]
pub use library_repository::MockLibraryRepository;
pub use library_repository::{
    FixtureLibraryRepository, LibraryRepository, LibraryRepositoryError,
};
#[cfg(test)]
pub use notification_command::{MockNotificationCommand, MockNotificationQuery};
pub use notification_command::{
    FixtureNotificationCommand, FixtureNotificationQuery, NotificationCommand, NotificationQuery,
};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{FixtureProfileQuery, ProfileQuery};
#[cfg(test)]
pub use recommendation_command::{MockRecommendationCommand, MockRecommendationQuery};
pub use recommendation_command::{
    FixtureRecommendationCommand, FixtureRecommendationQuery, RecommendBookRequest,
    RecommendationCommand, RecommendationQuery,
};
#[cfg(test)]
pub use recommendation_repository::MockRecommendationRepository;
pub use recommendation_repository::{
    RecommendationRepository, RecommendationRepositoryError,
};
