//! Database operations for the Brazilian localization tables.
//!
//! # Schema: `brazil`
//!
//! The add-on owns its tables and never touches the host's:
//!
//! - `user_account` - Email-as-username accounts with a person type
//! - `user_password` - Password hashes, one-to-one with accounts
//! - `person_profile` / `company_profile` - One-to-one profile records
//! - `mutable_address` / `immutable_address` - Editable vs. frozen addresses
//! - `extra_mutable_address` / `extra_immutable_address` - Brazilian extra
//!   fields, one-to-one with their address (PK is the address FK), removed
//!   with it (`ON DELETE CASCADE`)
//! - `checkout_order` - Orders referencing frozen addresses only
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and embedded
//! via [`MIGRATOR`]; the host (or the integration tests) runs them with
//! `MIGRATOR.run(&pool)`.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub mod addresses;
pub mod orders;
pub mod users;

pub use addresses::AddressRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Embedded migrations for the `brazil` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors returned by the repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The requested row does not exist.
    #[error("not found")]
    NotFound,
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A stored value failed to parse into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.url.expose_secret())
        .await
}
