pub mod health;
pub mod ingredient;
pub mod recipe;
pub mod shopping_cart;
pub mod tag;
pub mod user;
pub mod view;
