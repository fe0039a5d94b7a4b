//! Cartkeeper Core - Shared types library.
//!
//! This crate provides the domain types used by the Cartkeeper components:
//! - `storefront` - Cart web application
//! - `cli` - Command-line tools for migrations and catalogue seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no database
//! access, no HTTP. The session-stored [`Cart`] lives here so its arithmetic can
//! be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, products and the cart value

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
