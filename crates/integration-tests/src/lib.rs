//! Integration tests for the Quitanda Brazilian localization.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a disposable database
//! export QUITANDA_DATABASE_URL=postgres://localhost/quitanda_test
//!
//! # Run the DB-backed tests
//! cargo test -p quitanda-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `registration` - Account and profile creation
//! - `checkout_flow` - Address freezing and order confirmation

#![cfg_attr(not(test), forbid(unsafe_code))]

use sqlx::PgPool;

use quitanda_storefront::config::DatabaseConfig;
use quitanda_storefront::db::{self, MIGRATOR};

/// Shared setup for DB-backed tests: config, pool, migrations.
pub struct TestContext {
    /// Connection pool to the test database.
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database and apply migrations.
    ///
    /// # Panics
    ///
    /// Panics if the database is unreachable or migrations fail; these
    /// tests require a running `PostgreSQL` instance.
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let config = DatabaseConfig::from_env().expect("database configuration");
        let pool = db::create_pool(&config)
            .await
            .expect("failed to connect to the test database");
        MIGRATOR.run(&pool).await.expect("failed to run migrations");

        Self { pool }
    }

    /// A unique email per call so test reruns stay independent.
    ///
    /// # Panics
    ///
    /// Panics if the system clock is before the Unix epoch.
    #[must_use]
    pub fn unique_email(prefix: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before Unix epoch")
            .as_nanos();
        format!("{prefix}+{nanos}@example.com.br")
    }
}
