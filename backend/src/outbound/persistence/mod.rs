//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Validation and authorisation live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and the table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic side effects**: writes that notify another reader insert the
//!   notification inside the same transaction as the change.
//! - **Strongly typed errors**: pool and Diesel failures map onto each port's
//!   `Connection` / `Query` variants.
//!
//! # Example
//!
//! ```no_run
//! use shelfmate::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shelfmate")).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! # let _ = accounts;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_admin_repository;
mod diesel_basic_error_mapping;
mod diesel_book_repository;
mod diesel_friendship_repository;
mod diesel_library_repository;
mod diesel_notification_repository;
mod diesel_recommendation_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_book_repository::DieselBookRepository;
pub use diesel_friendship_repository::DieselFriendshipRepository;
pub use diesel_library_repository::DieselLibraryRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_recommendation_repository::DieselRecommendationRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
