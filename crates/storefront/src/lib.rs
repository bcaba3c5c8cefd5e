//! Quitanda Storefront - Brazilian localization library.
//!
//! This crate adapts the host storefront's registration and checkout to
//! Brazilian conventions. It owns the localization tables (profiles, extra
//! address fields, frozen checkout addresses) and exposes the services the
//! host wires into its forms and checkout phases. HTTP routing, templates,
//! sessions and email stay with the host.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;
