use surrealdb::{Connection, Surreal};

use crate::error::Result;

const SCHEMA: &str = r#"
    -- ---------------------
    -- users
    -- ---------------------
    DEFINE TABLE IF NOT EXISTS users SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS user_id    ON TABLE users TYPE string READONLY;
    DEFINE FIELD IF NOT EXISTS email      ON TABLE users TYPE string;
    DEFINE FIELD IF NOT EXISTS username   ON TABLE users TYPE string;
    DEFINE FIELD IF NOT EXISTS first_name ON TABLE users TYPE string;
    DEFINE FIELD IF NOT EXISTS last_name  ON TABLE users TYPE string;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE users TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS unique_email    ON TABLE users FIELDS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS unique_username ON TABLE users FIELDS username UNIQUE;

    -- ---------------------
    -- catalog
    -- ---------------------
    DEFINE TABLE IF NOT EXISTS tags SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS tag_id     ON TABLE tags TYPE string READONLY;
    DEFINE FIELD IF NOT EXISTS name       ON TABLE tags TYPE string;
    DEFINE FIELD IF NOT EXISTS color      ON TABLE tags TYPE string;
    DEFINE FIELD IF NOT EXISTS slug       ON TABLE tags TYPE string;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE tags TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS unique_tag_name  ON TABLE tags FIELDS name UNIQUE;
    DEFINE INDEX IF NOT EXISTS unique_tag_color ON TABLE tags FIELDS color UNIQUE;
    DEFINE INDEX IF NOT EXISTS unique_tag_slug  ON TABLE tags FIELDS slug UNIQUE;

    DEFINE TABLE IF NOT EXISTS ingredients SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS ingredient_id    ON TABLE ingredients TYPE string READONLY;
    DEFINE FIELD IF NOT EXISTS name             ON TABLE ingredients TYPE string;
    DEFINE FIELD IF NOT EXISTS measurement_unit ON TABLE ingredients TYPE string;
    DEFINE FIELD IF NOT EXISTS created_at       ON TABLE ingredients TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS ingredient_name_idx ON TABLE ingredients FIELDS name;

    -- ---------------------
    -- recipes (ingredient list is embedded)
    -- ---------------------
    DEFINE TABLE IF NOT EXISTS recipes SCHEMALESS;
    DEFINE FIELD IF NOT EXISTS recipe_id    ON TABLE recipes TYPE string READONLY;
    DEFINE FIELD IF NOT EXISTS author_id    ON TABLE recipes TYPE string;
    DEFINE FIELD IF NOT EXISTS name         ON TABLE recipes TYPE string ASSERT string::len($value) > 0;
    DEFINE FIELD IF NOT EXISTS cooking_time ON TABLE recipes TYPE int ASSERT $value >= 1;
    DEFINE FIELD IF NOT EXISTS tags         ON TABLE recipes TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS created_at   ON TABLE recipes TYPE int;
    DEFINE INDEX IF NOT EXISTS recipe_author_idx  ON TABLE recipes FIELDS author_id;
    DEFINE INDEX IF NOT EXISTS recipe_created_idx ON TABLE recipes FIELDS created_at;

    -- ---------------------
    -- user relations, keyed by [user_id, target_id]
    -- ---------------------
    DEFINE TABLE IF NOT EXISTS favorites SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS user_id    ON TABLE favorites TYPE string;
    DEFINE FIELD IF NOT EXISTS target_id  ON TABLE favorites TYPE string;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE favorites TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS favorites_user_idx   ON TABLE favorites FIELDS user_id;
    DEFINE INDEX IF NOT EXISTS favorites_target_idx ON TABLE favorites FIELDS target_id;

    DEFINE TABLE IF NOT EXISTS shopping_cart SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS user_id    ON TABLE shopping_cart TYPE string;
    DEFINE FIELD IF NOT EXISTS target_id  ON TABLE shopping_cart TYPE string;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE shopping_cart TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS cart_user_idx   ON TABLE shopping_cart FIELDS user_id;
    DEFINE INDEX IF NOT EXISTS cart_target_idx ON TABLE shopping_cart FIELDS target_id;

    DEFINE TABLE IF NOT EXISTS subscriptions SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS user_id    ON TABLE subscriptions TYPE string;
    DEFINE FIELD IF NOT EXISTS target_id  ON TABLE subscriptions TYPE string;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE subscriptions TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS subscriptions_user_idx ON TABLE subscriptions FIELDS user_id;
"#;

/// Defines every table, field and index; safe to run on each startup
pub async fn create_tables<C: Connection>(db: &Surreal<C>) -> Result<()> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}
