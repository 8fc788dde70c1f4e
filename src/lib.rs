//! # potluck
//!
//! Recipe sharing backend with favorites, subscriptions and an aggregated
//! shopping list.
//!
//! ## Crates
//!
//! - `potluck_core` - domain types, storage trait, relation toggles and
//!   shopping list aggregation
//! - `potluck_server` - axum HTTP service, settings and the SurrealDB backend

// Re-export all sub-crates
pub use potluck_core;
pub use potluck_server;
