use std::collections::HashMap;

use async_trait::async_trait;
use potluck_core::{
    CoreError, Ingredient, IngredientRow, Recipe, RecipeFilter, RecipeStore, RelationKind, Result,
    Tag, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use surrealdb::{Connection, Surreal};

/// Relation row as stored; the record key is `[user_id, target_id]`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelationRecord {
    user_id: String,
    target_id: String,
}

/// Maps a UNIQUE index violation to `Conflict`, anything else to `Store`
fn write_error(err: surrealdb::Error, conflict: &str) -> CoreError {
    if err.to_string().contains("already contains") {
        CoreError::Conflict(conflict.to_string())
    } else {
        CoreError::store(err)
    }
}

/// `RecipeStore` backed by SurrealDB
pub struct SurrealStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn taken(&self, table: &'static str, field: &'static str, value: &str) -> Result<bool> {
        let query = format!("SELECT VALUE {field} FROM {table} WHERE {field} = $value LIMIT 1");
        let found: Vec<String> = self
            .db
            .query(query)
            .bind(("value", value.to_string()))
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)?;
        Ok(!found.is_empty())
    }

    /// Creates `table:id`; the UNIQUE indexes still guard against a
    /// concurrent writer that slipped past `taken`
    async fn create_unique<T>(
        &self,
        table: &'static str,
        id: String,
        content: T,
        conflict: &str,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let created: Option<T> = self
            .db
            .create((table, id))
            .content(content)
            .await
            .map_err(|e| write_error(e, conflict))?;
        created.ok_or_else(|| CoreError::Store(format!("Failed to create {table} record")))
    }
}

const USER_TAKEN: &str = "A user with this email or username already exists!";
const TAG_TAKEN: &str = "A tag with this name, color or slug already exists!";

#[async_trait]
impl<C: Connection> RecipeStore for SurrealStore<C> {
    async fn insert_user(&self, user: User) -> Result<User> {
        if self.taken("users", "email", &user.email).await? {
            return Err(CoreError::Conflict(
                "A user with this email already exists!".into(),
            ));
        }
        if self.taken("users", "username", &user.username).await? {
            return Err(CoreError::Conflict(
                "A user with this username already exists!".into(),
            ));
        }

        let id = user.user_id.clone();
        self.create_unique("users", id, user, USER_TAKEN).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.db
            .select(("users", user_id))
            .await
            .map_err(CoreError::store)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.db
            .query("SELECT * FROM users ORDER BY created_at ASC")
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)
    }

    async fn insert_tag(&self, tag: Tag) -> Result<Tag> {
        for (field, value) in [("name", &tag.name), ("color", &tag.color), ("slug", &tag.slug)] {
            if self.taken("tags", field, value).await? {
                return Err(CoreError::Conflict(TAG_TAKEN.into()));
            }
        }

        let id = tag.tag_id.clone();
        self.create_unique("tags", id, tag, TAG_TAKEN).await
    }

    async fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>> {
        self.db
            .select(("tags", tag_id))
            .await
            .map_err(CoreError::store)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.db
            .query("SELECT * FROM tags ORDER BY created_at ASC")
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)
    }

    async fn insert_ingredient(&self, ingredient: Ingredient) -> Result<Ingredient> {
        let created: Option<Ingredient> = self
            .db
            .create(("ingredients", ingredient.ingredient_id.clone()))
            .content(ingredient)
            .await
            .map_err(CoreError::store)?;
        created.ok_or_else(|| CoreError::Store("Failed to create ingredient".into()))
    }

    async fn get_ingredient(&self, ingredient_id: &str) -> Result<Option<Ingredient>> {
        self.db
            .select(("ingredients", ingredient_id))
            .await
            .map_err(CoreError::store)
    }

    async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>> {
        let mut response = match name_prefix {
            Some(prefix) => {
                self.db
                    .query(
                        "SELECT * FROM ingredients \
                         WHERE string::starts_with(string::lowercase(name), $prefix) \
                         ORDER BY created_at ASC",
                    )
                    .bind(("prefix", prefix.to_lowercase()))
                    .await
            }
            None => {
                self.db
                    .query("SELECT * FROM ingredients ORDER BY created_at ASC")
                    .await
            }
        }
        .map_err(CoreError::store)?;
        response.take(0).map_err(CoreError::store)
    }

    async fn insert_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        let created: Option<Recipe> = self
            .db
            .create(("recipes", recipe.recipe_id.clone()))
            .content(recipe)
            .await
            .map_err(CoreError::store)?;
        created.ok_or_else(|| CoreError::Store("Failed to create recipe".into()))
    }

    async fn update_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        let recipe_id = recipe.recipe_id.clone();
        let updated: Option<Recipe> = self
            .db
            .update(("recipes", recipe.recipe_id.clone()))
            .content(recipe)
            .await
            .map_err(CoreError::store)?;
        updated.ok_or_else(|| CoreError::NotFound(format!("recipe {recipe_id} not found")))
    }

    async fn get_recipe(&self, recipe_id: &str) -> Result<Option<Recipe>> {
        self.db
            .select(("recipes", recipe_id))
            .await
            .map_err(CoreError::store)
    }

    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let mut query = "SELECT * FROM recipes WHERE true".to_string();
        let mut bindings = vec![];

        if let Some(author) = &filter.author_id {
            query.push_str(" AND author_id = $author_id");
            bindings.push(("author_id", author.clone()));
        }

        if !filter.tag_slugs.is_empty() {
            query.push_str(
                " AND tags CONTAINSANY (SELECT VALUE tag_id FROM tags WHERE slug IN $tag_slugs)",
            );
        }

        if let Some(user) = &filter.favorited_by {
            query.push_str(
                " AND recipe_id IN (SELECT VALUE target_id FROM favorites WHERE user_id = $fav_user)",
            );
            bindings.push(("fav_user", user.clone()));
        }

        if let Some(user) = &filter.in_cart_of {
            query.push_str(
                " AND recipe_id IN \
                 (SELECT VALUE target_id FROM shopping_cart WHERE user_id = $cart_user)",
            );
            bindings.push(("cart_user", user.clone()));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut db_query = self.db.query(query);
        for (key, value) in bindings {
            db_query = db_query.bind((key, value));
        }
        if !filter.tag_slugs.is_empty() {
            db_query = db_query.bind(("tag_slugs", filter.tag_slugs.clone()));
        }

        let mut response = db_query.await.map_err(CoreError::store)?;
        response.take(0).map_err(CoreError::store)
    }

    async fn delete_recipe(&self, recipe_id: &str) -> Result<bool> {
        let mut response = self
            .db
            .query(
                "DELETE type::thing('recipes', $recipe_id) RETURN BEFORE;
                 DELETE favorites WHERE target_id = $recipe_id;
                 DELETE shopping_cart WHERE target_id = $recipe_id;",
            )
            .bind(("recipe_id", recipe_id.to_string()))
            .await
            .map_err(CoreError::store)?
            .check()
            .map_err(CoreError::store)?;
        let removed: Vec<Option<Recipe>> = response.take(0).map_err(CoreError::store)?;
        Ok(removed.into_iter().flatten().next().is_some())
    }

    async fn insert_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        // MERGE keeps created_at of an existing row; BEFORE is NONE only for a new row
        let before: Vec<Option<RelationRecord>> = self
            .db
            .query(
                "UPSERT type::thing($tb, [$user_id, $target_id]) \
                 MERGE { user_id: $user_id, target_id: $target_id } RETURN BEFORE",
            )
            .bind(("tb", kind.table()))
            .bind(("user_id", user_id.to_string()))
            .bind(("target_id", target_id.to_string()))
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)?;
        Ok(before.into_iter().flatten().next().is_none())
    }

    async fn delete_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        let before: Vec<Option<RelationRecord>> = self
            .db
            .query("DELETE type::thing($tb, [$user_id, $target_id]) RETURN BEFORE")
            .bind(("tb", kind.table()))
            .bind(("user_id", user_id.to_string()))
            .bind(("target_id", target_id.to_string()))
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)?;
        Ok(before.into_iter().flatten().next().is_some())
    }

    async fn has_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        let rows: Vec<RelationRecord> = self
            .db
            .query("SELECT * FROM type::thing($tb, [$user_id, $target_id])")
            .bind(("tb", kind.table()))
            .bind(("user_id", user_id.to_string()))
            .bind(("target_id", target_id.to_string()))
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)?;
        Ok(!rows.is_empty())
    }

    async fn relation_targets(&self, kind: RelationKind, user_id: &str) -> Result<Vec<String>> {
        let rows: Vec<RelationRecord> = self
            .db
            .query(
                "SELECT user_id, target_id, created_at FROM type::table($tb) \
                 WHERE user_id = $user_id ORDER BY created_at ASC",
            )
            .bind(("tb", kind.table()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)?;
        Ok(rows.into_iter().map(|r| r.target_id).collect())
    }

    /// One query for the whole recipe instead of one per ingredient
    async fn ingredient_rows(&self, recipe: &Recipe) -> Result<Vec<IngredientRow>> {
        let ids: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|i| i.ingredient_id.clone())
            .collect();
        let found: Vec<Ingredient> = self
            .db
            .query("SELECT * FROM ingredients WHERE ingredient_id IN $ids")
            .bind(("ids", ids))
            .await
            .map_err(CoreError::store)?
            .take(0)
            .map_err(CoreError::store)?;
        let by_id: HashMap<&str, &Ingredient> = found
            .iter()
            .map(|i| (i.ingredient_id.as_str(), i))
            .collect();

        recipe
            .ingredients
            .iter()
            .map(|item| {
                let ingredient = by_id.get(item.ingredient_id.as_str()).ok_or_else(|| {
                    CoreError::Store(format!(
                        "recipe {} references missing ingredient {}",
                        recipe.recipe_id, item.ingredient_id
                    ))
                })?;
                Ok(IngredientRow {
                    ingredient_id: ingredient.ingredient_id.clone(),
                    name: ingredient.name.clone(),
                    amount: item.amount,
                    measurement_unit: ingredient.measurement_unit.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use potluck_core::{NewIngredient, NewTag, NewUser, RecipeIngredient, new_id, now_micros};
    use surrealdb::engine::local::{Db, Mem};

    use super::*;
    use crate::db::create_tables;

    async fn store() -> SurrealStore<Db> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("potluck").use_db("test").await.unwrap();
        create_tables(&db).await.unwrap();
        SurrealStore::new(db)
    }

    fn user(name: &str) -> User {
        NewUser {
            email: format!("{name}@example.com"),
            username: name.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
        }
        .into_user()
    }

    async fn recipe(store: &SurrealStore<Db>, author: &User, tag: &Tag, name: &str) -> Recipe {
        let flour = store
            .insert_ingredient(
                NewIngredient {
                    name: format!("{name} flour"),
                    measurement_unit: "g".into(),
                }
                .into_ingredient(),
            )
            .await
            .unwrap();
        store
            .insert_recipe(Recipe {
                recipe_id: new_id(),
                author_id: author.user_id.clone(),
                name: name.into(),
                text: "Bake.".into(),
                cooking_time: 30,
                tags: vec![tag.tag_id.clone()],
                ingredients: vec![RecipeIngredient {
                    ingredient_id: flour.ingredient_id,
                    amount: 200,
                }],
                created_at: now_micros(),
            })
            .await
            .unwrap()
    }

    async fn tag(store: &SurrealStore<Db>, slug: &str, color: &str) -> Tag {
        store
            .insert_tag(
                NewTag {
                    name: slug.to_uppercase(),
                    color: color.into(),
                    slug: slug.into(),
                }
                .into_tag(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_relation_insert_is_insert_if_absent() {
        let store = store().await;
        let kind = RelationKind::Favorite;

        assert!(store.insert_relation(kind, "u1", "r1").await.unwrap());
        assert!(!store.insert_relation(kind, "u1", "r1").await.unwrap());
        assert!(store.has_relation(kind, "u1", "r1").await.unwrap());
        assert!(!store.has_relation(RelationKind::ShoppingCart, "u1", "r1").await.unwrap());
        assert_eq!(store.relation_targets(kind, "u1").await.unwrap(), vec!["r1"]);
    }

    #[tokio::test]
    async fn test_relation_delete_is_delete_if_present() {
        let store = store().await;
        let kind = RelationKind::ShoppingCart;

        assert!(!store.delete_relation(kind, "u1", "r1").await.unwrap());
        store.insert_relation(kind, "u1", "r1").await.unwrap();
        assert!(store.delete_relation(kind, "u1", "r1").await.unwrap());
        assert!(!store.delete_relation(kind, "u1", "r1").await.unwrap());
        assert!(store.relation_targets(kind, "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relation_targets_keep_insertion_order() {
        let store = store().await;
        let kind = RelationKind::Subscription;
        for target in ["b", "a", "c"] {
            store.insert_relation(kind, "u1", target).await.unwrap();
        }

        assert_eq!(
            store.relation_targets(kind, "u1").await.unwrap(),
            vec!["b", "a", "c"]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_recipe() {
        let store = store().await;
        assert!(!store.delete_recipe("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_recipe_drops_relations() {
        let store = store().await;
        let author = store.insert_user(user("anna")).await.unwrap();
        let baking = tag(&store, "baking", "#111111").await;
        let bread = recipe(&store, &author, &baking, "Bread").await;
        let cake = recipe(&store, &author, &baking, "Cake").await;
        for kind in [RelationKind::Favorite, RelationKind::ShoppingCart] {
            store.insert_relation(kind, "u1", &bread.recipe_id).await.unwrap();
            store.insert_relation(kind, "u1", &cake.recipe_id).await.unwrap();
        }

        assert!(store.delete_recipe(&bread.recipe_id).await.unwrap());
        assert!(store.get_recipe(&bread.recipe_id).await.unwrap().is_none());
        for kind in [RelationKind::Favorite, RelationKind::ShoppingCart] {
            assert_eq!(
                store.relation_targets(kind, "u1").await.unwrap(),
                vec![cake.recipe_id.clone()]
            );
        }
    }

    #[tokio::test]
    async fn test_list_recipes_filters() {
        let store = store().await;
        let anna = store.insert_user(user("anna")).await.unwrap();
        let ben = store.insert_user(user("ben")).await.unwrap();
        let breakfast = tag(&store, "breakfast", "#222222").await;
        let dinner = tag(&store, "dinner", "#333333").await;
        let porridge = recipe(&store, &anna, &breakfast, "Porridge").await;
        let stew = recipe(&store, &ben, &dinner, "Stew").await;
        store
            .insert_relation(RelationKind::Favorite, &anna.user_id, &stew.recipe_id)
            .await
            .unwrap();

        let ids = |recipes: Vec<Recipe>| -> Vec<String> {
            recipes.into_iter().map(|r| r.recipe_id).collect()
        };

        let all = store.list_recipes(&RecipeFilter::default()).await.unwrap();
        assert_eq!(ids(all), vec![stew.recipe_id.clone(), porridge.recipe_id.clone()]);

        let by_tag = RecipeFilter {
            tag_slugs: vec!["breakfast".into(), "lunch".into()],
            ..Default::default()
        };
        assert_eq!(
            ids(store.list_recipes(&by_tag).await.unwrap()),
            vec![porridge.recipe_id.clone()]
        );

        let by_author = RecipeFilter {
            author_id: Some(ben.user_id.clone()),
            ..Default::default()
        };
        assert_eq!(
            ids(store.list_recipes(&by_author).await.unwrap()),
            vec![stew.recipe_id.clone()]
        );

        let favorites = RecipeFilter {
            favorited_by: Some(anna.user_id.clone()),
            ..Default::default()
        };
        assert_eq!(
            ids(store.list_recipes(&favorites).await.unwrap()),
            vec![stew.recipe_id.clone()]
        );
    }

    #[tokio::test]
    async fn test_duplicate_user_is_conflict() {
        let store = store().await;
        store.insert_user(user("anna")).await.unwrap();

        let err = store.insert_user(user("anna")).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        // A writer that got past the pre-check still hits the UNIQUE index
        let racing = user("anna");
        let err = store
            .create_unique("users", racing.user_id.clone(), racing, USER_TAKEN)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::Conflict(USER_TAKEN.into()));
    }

    #[tokio::test]
    async fn test_duplicate_tag_is_conflict() {
        let store = store().await;
        tag(&store, "baking", "#111111").await;

        let clash = NewTag {
            name: "Other".into(),
            color: "#111111".into(),
            slug: "other".into(),
        }
        .into_tag();
        let err = store
            .create_unique("tags", clash.tag_id.clone(), clash, TAG_TAKEN)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::Conflict(TAG_TAKEN.into()));
    }

    #[tokio::test]
    async fn test_ingredient_rows_follow_recipe_order() {
        let store = store().await;
        let author = store.insert_user(user("anna")).await.unwrap();
        let baking = tag(&store, "baking", "#111111").await;
        let bread = recipe(&store, &author, &baking, "Bread").await;

        let rows = store.ingredient_rows(&bread).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bread flour");
        assert_eq!(rows[0].amount, 200);
    }
}
