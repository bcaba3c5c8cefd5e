//! Checkout error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during order confirmation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// An address being frozen does not exist.
    #[error("checkout address not found")]
    AddressNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
