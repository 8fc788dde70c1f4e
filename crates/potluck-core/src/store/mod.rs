//! Persistence abstraction
//!
//! Every backend implements [`RecipeStore`]; the services in this crate only
//! talk to the trait, so the HTTP layer can pick a backend at startup.

use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStore;

use crate::{
    error::{CoreError, Result},
    relation::RelationKind,
    types::{Ingredient, IngredientRow, Recipe, RecipeFilter, Tag, User},
};

/// Storage backend for users, catalog, recipes and user relations
///
/// Relation writes must be atomic per (kind, user, target): `insert_relation`
/// is an insert-if-absent and `delete_relation` a delete-if-present, each in a
/// single backend operation.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Fails with `Conflict` when the email or username is taken
    async fn insert_user(&self, user: User) -> Result<User>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// All users in registration order
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Fails with `Conflict` when the name, color or slug is taken
    async fn insert_tag(&self, tag: Tag) -> Result<Tag>;

    async fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>>;

    /// All tags in creation order
    async fn list_tags(&self) -> Result<Vec<Tag>>;

    async fn insert_ingredient(&self, ingredient: Ingredient) -> Result<Ingredient>;

    async fn get_ingredient(&self, ingredient_id: &str) -> Result<Option<Ingredient>>;

    /// Ingredients in creation order, optionally narrowed to a
    /// case-insensitive name prefix
    async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>>;

    async fn insert_recipe(&self, recipe: Recipe) -> Result<Recipe>;

    /// Replaces the stored recipe with the same id
    async fn update_recipe(&self, recipe: Recipe) -> Result<Recipe>;

    async fn get_recipe(&self, recipe_id: &str) -> Result<Option<Recipe>>;

    /// Matching recipes, newest first
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>>;

    /// Removes the recipe and every favorite / cart relation pointing at it.
    /// Returns whether the recipe existed.
    async fn delete_recipe(&self, recipe_id: &str) -> Result<bool>;

    /// Insert-if-absent. Returns `false` when the relation already existed.
    async fn insert_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool>;

    /// Delete-if-present. Returns `false` when there was nothing to delete.
    async fn delete_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool>;

    async fn has_relation(&self, kind: RelationKind, user_id: &str, target_id: &str)
    -> Result<bool>;

    /// Target ids of the user's relations of this kind, oldest first
    async fn relation_targets(&self, kind: RelationKind, user_id: &str) -> Result<Vec<String>>;

    /// Recipe ingredients joined with the catalog, in recipe order
    async fn ingredient_rows(&self, recipe: &Recipe) -> Result<Vec<IngredientRow>> {
        let mut rows = Vec::with_capacity(recipe.ingredients.len());
        for item in &recipe.ingredients {
            let ingredient = self
                .get_ingredient(&item.ingredient_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Store(format!(
                        "recipe {} references missing ingredient {}",
                        recipe.recipe_id, item.ingredient_id
                    ))
                })?;
            rows.push(IngredientRow {
                ingredient_id: ingredient.ingredient_id,
                name: ingredient.name,
                amount: item.amount,
                measurement_unit: ingredient.measurement_unit,
            });
        }
        Ok(rows)
    }
}
