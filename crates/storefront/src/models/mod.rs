//! Domain models for storefront.
//!
//! Product and cart types live in `cartkeeper-core`; this module only holds
//! what is specific to the web layer.

pub mod session;

pub use session::keys as session_keys;
