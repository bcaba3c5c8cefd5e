//! Quitanda Core - Shared types for the Brazilian localization.
//!
//! This crate provides the common types used by the Quitanda Brazil add-on:
//! - `storefront` - Registration and checkout glue wired into the host shop
//! - host applications embedding the localization directly
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. The
//! CPF/CNPJ validators are pure functions over digit strings, so they can be
//! called from form handlers, repositories, or batch jobs alike.
//!
//! # Modules
//!
//! - [`types`] - Taxpayer identifiers, person/taxation enums, typed IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
