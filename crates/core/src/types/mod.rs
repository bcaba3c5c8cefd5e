//! Core types for the Brazilian localization.
//!
//! This module provides type-safe wrappers for the domain concepts the
//! add-on introduces on top of the host storefront.

pub mod email;
pub mod id;
pub mod person;
pub mod taxpayer;

pub use email::{Email, EmailError};
pub use id::*;
pub use person::{Gender, PersonType, Taxation};
pub use taxpayer::{Cnpj, Cpf, TaxpayerIdError};
