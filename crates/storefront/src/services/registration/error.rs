//! Registration error types.

use thiserror::Error;

use quitanda_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during registration.
///
/// The CPF/CNPJ variants carry the offending value so the host can
/// interpolate it into the field error shown back on the form.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The submitted CPF failed validation.
    #[error("{0} is not a valid CPF")]
    InvalidCpf(String),

    /// The submitted CNPJ failed validation.
    #[error("{0} is not a valid CNPJ")]
    InvalidCnpj(String),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// A required profile field was missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email is already registered.
    #[error("a user with that email already exists")]
    EmailTaken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
