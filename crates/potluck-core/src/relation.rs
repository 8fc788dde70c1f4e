//! User relations: favorites, shopping cart and subscriptions
//!
//! Each relation is a two-state toggle between one user and one target.
//! `add` on a present relation is a conflict, `remove` on an absent one is a
//! vacuous delete, and either call on a missing target is not-found.

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    store::RecipeStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// user -> recipe
    Favorite,
    /// user -> recipe
    ShoppingCart,
    /// user -> followed user
    Subscription,
}

impl RelationKind {
    /// Backend table name
    pub fn table(self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorites",
            RelationKind::ShoppingCart => "shopping_cart",
            RelationKind::Subscription => "subscriptions",
        }
    }

    fn already_present(self) -> &'static str {
        match self {
            RelationKind::Favorite => "Recipe is already in favorites!",
            RelationKind::ShoppingCart => "Recipe is already in the shopping list!",
            RelationKind::Subscription => "You are already subscribed to this user!",
        }
    }

    fn not_present(self) -> &'static str {
        match self {
            RelationKind::Favorite => "This recipe is not in favorites!",
            RelationKind::ShoppingCart => "This recipe is not in the shopping list!",
            RelationKind::Subscription => "You were not subscribed to this user!",
        }
    }

    fn targets_user(self) -> bool {
        matches!(self, RelationKind::Subscription)
    }
}

async fn ensure_target(store: &dyn RecipeStore, kind: RelationKind, target_id: &str) -> Result<()> {
    let exists = if kind.targets_user() {
        store.get_user(target_id).await?.is_some()
    } else {
        store.get_recipe(target_id).await?.is_some()
    };
    if exists {
        Ok(())
    } else if kind.targets_user() {
        Err(CoreError::NotFound(format!("user {target_id} not found")))
    } else {
        Err(CoreError::NotFound(format!("recipe {target_id} not found")))
    }
}

/// Creates the relation between `user_id` and `target_id`
pub async fn add(
    store: &dyn RecipeStore,
    kind: RelationKind,
    user_id: &str,
    target_id: &str,
) -> Result<()> {
    ensure_target(store, kind, target_id).await?;
    if kind.targets_user() && user_id == target_id {
        return Err(CoreError::Validation(
            "You cannot subscribe to yourself!".into(),
        ));
    }

    if !store.insert_relation(kind, user_id, target_id).await? {
        return Err(CoreError::Conflict(kind.already_present().into()));
    }
    tracing::debug!(?kind, user_id, target_id, "relation added");
    Ok(())
}

/// Deletes the relation between `user_id` and `target_id`
pub async fn remove(
    store: &dyn RecipeStore,
    kind: RelationKind,
    user_id: &str,
    target_id: &str,
) -> Result<()> {
    ensure_target(store, kind, target_id).await?;

    if !store.delete_relation(kind, user_id, target_id).await? {
        return Err(CoreError::NotPresent(kind.not_present().into()));
    }
    tracing::debug!(?kind, user_id, target_id, "relation removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::MemoryStore,
        types::{NewUser, Recipe, User, new_id, now_micros},
    };

    async fn seed(store: &MemoryStore) -> (User, Recipe) {
        let user = store
            .insert_user(
                NewUser {
                    email: "anna@example.com".into(),
                    username: "anna".into(),
                    first_name: "Anna".into(),
                    last_name: "Cook".into(),
                }
                .into_user(),
            )
            .await
            .unwrap();
        let recipe = store
            .insert_recipe(Recipe {
                recipe_id: new_id(),
                author_id: user.user_id.clone(),
                name: "Pancakes".into(),
                text: "Mix and fry".into(),
                cooking_time: 20,
                tags: vec![],
                ingredients: vec![],
                created_at: now_micros(),
            })
            .await
            .unwrap();
        (user, recipe)
    }

    #[tokio::test]
    async fn test_double_favorite_is_conflict() {
        let store = MemoryStore::new();
        let (user, recipe) = seed(&store).await;

        add(&store, RelationKind::Favorite, &user.user_id, &recipe.recipe_id)
            .await
            .unwrap();
        let err = add(&store, RelationKind::Favorite, &user.user_id, &recipe.recipe_id)
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::Conflict("Recipe is already in favorites!".into()));
        assert_eq!(
            store
                .relation_targets(RelationKind::Favorite, &user.user_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_unfavorite_never_favorited_is_not_present() {
        let store = MemoryStore::new();
        let (user, recipe) = seed(&store).await;

        let err = remove(&store, RelationKind::Favorite, &user.user_id, &recipe.recipe_id)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::NotPresent("This recipe is not in favorites!".into()));
    }

    #[tokio::test]
    async fn test_unfavorite_missing_recipe_is_not_found() {
        let store = MemoryStore::new();
        let (user, _) = seed(&store).await;

        let err = remove(&store, RelationKind::Favorite, &user.user_id, "no-such-recipe")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cart_add_then_remove() {
        let store = MemoryStore::new();
        let (user, recipe) = seed(&store).await;

        add(&store, RelationKind::ShoppingCart, &user.user_id, &recipe.recipe_id)
            .await
            .unwrap();
        remove(&store, RelationKind::ShoppingCart, &user.user_id, &recipe.recipe_id)
            .await
            .unwrap();
        assert!(
            !store
                .has_relation(RelationKind::ShoppingCart, &user.user_id, &recipe.recipe_id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_self_subscription_rejected() {
        let store = MemoryStore::new();
        let (user, _) = seed(&store).await;

        let err = add(&store, RelationKind::Subscription, &user.user_id, &user.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_subscribe_to_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let (user, _) = seed(&store).await;

        let err = add(&store, RelationKind::Subscription, &user.user_id, "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
