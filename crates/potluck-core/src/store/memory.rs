//! In-process store
//!
//! Keeps every table in one struct behind a single `RwLock`, which makes each
//! trait call atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecipeStore;
use crate::{
    error::{CoreError, Result},
    relation::RelationKind,
    types::{Ingredient, Recipe, RecipeFilter, Tag, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    /// Creation order; listing walks it backwards
    recipes: Vec<Recipe>,
    /// (user, target) pairs per kind, oldest first
    relations: HashMap<RelationKind, Vec<(String, String)>>,
}

impl Tables {
    fn related(&self, kind: RelationKind, user_id: &str, target_id: &str) -> bool {
        self.relations
            .get(&kind)
            .is_some_and(|rows| rows.iter().any(|(u, t)| u == user_id && t == target_id))
    }

    fn tag_ids_for_slugs(&self, slugs: &[String]) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|tag| slugs.contains(&tag.slug))
            .map(|tag| tag.tag_id.as_str())
            .collect()
    }
}

/// Store backed by process memory; contents are lost on shutdown
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(CoreError::Conflict(
                "A user with this email already exists!".into(),
            ));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(CoreError::Conflict(
                "A user with this username already exists!".into(),
            ));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn insert_tag(&self, tag: Tag) -> Result<Tag> {
        let mut tables = self.tables.write().await;
        if tables
            .tags
            .iter()
            .any(|t| t.name == tag.name || t.slug == tag.slug || t.color == tag.color)
        {
            return Err(CoreError::Conflict(format!(
                "tag `{}` clashes with an existing name, slug or color",
                tag.slug
            )));
        }
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>> {
        let tables = self.tables.read().await;
        Ok(tables.tags.iter().find(|t| t.tag_id == tag_id).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tables.read().await.tags.clone())
    }

    async fn insert_ingredient(&self, ingredient: Ingredient) -> Result<Ingredient> {
        self.tables.write().await.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    async fn get_ingredient(&self, ingredient_id: &str) -> Result<Option<Ingredient>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ingredients
            .iter()
            .find(|i| i.ingredient_id == ingredient_id)
            .cloned())
    }

    async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>> {
        let tables = self.tables.read().await;
        let prefix = name_prefix.map(str::to_lowercase);
        Ok(tables
            .ingredients
            .iter()
            .filter(|i| {
                prefix
                    .as_deref()
                    .is_none_or(|p| i.name.to_lowercase().starts_with(p))
            })
            .cloned()
            .collect())
    }

    async fn insert_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        self.tables.write().await.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .recipes
            .iter_mut()
            .find(|r| r.recipe_id == recipe.recipe_id)
            .ok_or_else(|| CoreError::NotFound(format!("recipe {} not found", recipe.recipe_id)))?;
        *slot = recipe.clone();
        Ok(recipe)
    }

    async fn get_recipe(&self, recipe_id: &str) -> Result<Option<Recipe>> {
        let tables = self.tables.read().await;
        Ok(tables.recipes.iter().find(|r| r.recipe_id == recipe_id).cloned())
    }

    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let tables = self.tables.read().await;
        let tag_ids = tables.tag_ids_for_slugs(&filter.tag_slugs);

        Ok(tables
            .recipes
            .iter()
            .rev()
            .filter(|r| {
                filter
                    .author_id
                    .as_deref()
                    .is_none_or(|author| r.author_id == author)
            })
            .filter(|r| {
                filter.tag_slugs.is_empty()
                    || r.tags.iter().any(|t| tag_ids.contains(&t.as_str()))
            })
            .filter(|r| {
                filter.favorited_by.as_deref().is_none_or(|user| {
                    tables.related(RelationKind::Favorite, user, &r.recipe_id)
                })
            })
            .filter(|r| {
                filter.in_cart_of.as_deref().is_none_or(|user| {
                    tables.related(RelationKind::ShoppingCart, user, &r.recipe_id)
                })
            })
            .cloned()
            .collect())
    }

    async fn delete_recipe(&self, recipe_id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.recipes.len();
        tables.recipes.retain(|r| r.recipe_id != recipe_id);
        if tables.recipes.len() == before {
            return Ok(false);
        }
        for kind in [RelationKind::Favorite, RelationKind::ShoppingCart] {
            if let Some(rows) = tables.relations.get_mut(&kind) {
                rows.retain(|(_, target)| target != recipe_id);
            }
        }
        Ok(true)
    }

    async fn insert_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.related(kind, user_id, target_id) {
            return Ok(false);
        }
        tables
            .relations
            .entry(kind)
            .or_default()
            .push((user_id.to_string(), target_id.to_string()));
        Ok(true)
    }

    async fn delete_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.relations.get_mut(&kind) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|(u, t)| !(u == user_id && t == target_id));
        Ok(rows.len() != before)
    }

    async fn has_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        Ok(self.tables.read().await.related(kind, user_id, target_id))
    }

    async fn relation_targets(&self, kind: RelationKind, user_id: &str) -> Result<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .relations
            .get(&kind)
            .map(|rows| {
                rows.iter()
                    .filter(|(u, _)| u == user_id)
                    .map(|(_, t)| t.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewIngredient, NewTag, NewUser, RecipeIngredient, now_micros};

    fn user(name: &str) -> User {
        NewUser {
            email: format!("{name}@example.com"),
            username: name.to_string(),
            first_name: name.to_string(),
            last_name: "Cook".to_string(),
        }
        .into_user()
    }

    fn recipe(author: &User, tags: Vec<String>) -> Recipe {
        Recipe {
            recipe_id: crate::types::new_id(),
            author_id: author.user_id.clone(),
            name: "Soup".to_string(),
            text: "Boil".to_string(),
            cooking_time: 10,
            tags,
            ingredients: vec![],
            created_at: now_micros(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let store = MemoryStore::new();
        store.insert_user(user("anna")).await.unwrap();

        let mut clash = user("bob");
        clash.username = "anna".to_string();
        let err = store.insert_user(clash).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_relation_insert_is_idempotent() {
        let store = MemoryStore::new();

        assert!(store.insert_relation(RelationKind::Favorite, "u", "r").await.unwrap());
        assert!(!store.insert_relation(RelationKind::Favorite, "u", "r").await.unwrap());
        assert_eq!(
            store.relation_targets(RelationKind::Favorite, "u").await.unwrap(),
            vec!["r".to_string()]
        );

        // Kinds do not share rows
        assert!(!store.has_relation(RelationKind::ShoppingCart, "u", "r").await.unwrap());

        assert!(store.delete_relation(RelationKind::Favorite, "u", "r").await.unwrap());
        assert!(!store.delete_relation(RelationKind::Favorite, "u", "r").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_recipes_newest_first_with_filters() {
        let store = MemoryStore::new();
        let anna = store.insert_user(user("anna")).await.unwrap();
        let bob = store.insert_user(user("bob")).await.unwrap();
        let lunch = store
            .insert_tag(
                NewTag {
                    name: "Lunch".into(),
                    color: "#00FF00".into(),
                    slug: "lunch".into(),
                }
                .into_tag(),
            )
            .await
            .unwrap();

        let first = store.insert_recipe(recipe(&anna, vec![])).await.unwrap();
        let second = store
            .insert_recipe(recipe(&bob, vec![lunch.tag_id.clone()]))
            .await
            .unwrap();

        let all = store.list_recipes(&RecipeFilter::default()).await.unwrap();
        assert_eq!(all, vec![second.clone(), first.clone()]);

        let by_anna = RecipeFilter {
            author_id: Some(anna.user_id.clone()),
            ..Default::default()
        };
        assert_eq!(store.list_recipes(&by_anna).await.unwrap(), vec![first.clone()]);

        let tagged = RecipeFilter {
            tag_slugs: vec!["lunch".into(), "dinner".into()],
            ..Default::default()
        };
        assert_eq!(store.list_recipes(&tagged).await.unwrap(), vec![second.clone()]);

        store
            .insert_relation(RelationKind::ShoppingCart, &anna.user_id, &first.recipe_id)
            .await
            .unwrap();
        let cart = RecipeFilter {
            in_cart_of: Some(anna.user_id.clone()),
            ..Default::default()
        };
        assert_eq!(store.list_recipes(&cart).await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_delete_recipe_drops_its_relations() {
        let store = MemoryStore::new();
        let anna = store.insert_user(user("anna")).await.unwrap();
        let soup = store.insert_recipe(recipe(&anna, vec![])).await.unwrap();
        store
            .insert_relation(RelationKind::Favorite, &anna.user_id, &soup.recipe_id)
            .await
            .unwrap();
        store
            .insert_relation(RelationKind::ShoppingCart, &anna.user_id, &soup.recipe_id)
            .await
            .unwrap();

        assert!(store.delete_recipe(&soup.recipe_id).await.unwrap());
        assert!(!store.delete_recipe(&soup.recipe_id).await.unwrap());
        assert!(
            store
                .relation_targets(RelationKind::Favorite, &anna.user_id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            store
                .relation_targets(RelationKind::ShoppingCart, &anna.user_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_ingredient_prefix_search_ignores_case() {
        let store = MemoryStore::new();
        for name in ["Sugar", "salt", "Flour"] {
            store
                .insert_ingredient(
                    NewIngredient {
                        name: name.to_string(),
                        measurement_unit: "g".to_string(),
                    }
                    .into_ingredient(),
                )
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_ingredients(Some("S"))
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Sugar", "salt"]);
        assert_eq!(store.list_ingredients(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_ingredient_rows_join_catalog() {
        let store = MemoryStore::new();
        let anna = store.insert_user(user("anna")).await.unwrap();
        let flour = store
            .insert_ingredient(
                NewIngredient {
                    name: "Flour".into(),
                    measurement_unit: "g".into(),
                }
                .into_ingredient(),
            )
            .await
            .unwrap();
        let mut bread = recipe(&anna, vec![]);
        bread.ingredients = vec![RecipeIngredient {
            ingredient_id: flour.ingredient_id.clone(),
            amount: 500,
        }];

        let rows = store.ingredient_rows(&bread).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Flour");
        assert_eq!(rows[0].amount, 500);
        assert_eq!(rows[0].measurement_unit, "g");
    }
}
