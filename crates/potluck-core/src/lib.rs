//! # potluck-core
//!
//! Domain layer of the potluck recipe service.
//!
//! - `types` - users, tags, ingredients and recipes
//! - `store` - the `RecipeStore` backend trait and an in-memory backend
//! - `relation` - favorite / shopping cart / subscription toggles
//! - `recipe`, `user` - authoring and registration rules
//! - `shopping` - shopping list aggregation and rendering

pub mod error;
pub mod recipe;
pub mod relation;
pub mod shopping;
pub mod store;
pub mod types;
pub mod user;

pub use error::{CoreError, Result};
pub use relation::RelationKind;
pub use shopping::{AggregatedLine, UnitPolicy};
pub use store::{MemoryStore, RecipeStore};
pub use types::*;
