//! Response assembly shared by the user and recipe handlers.
//!
//! Every view is computed for a viewer: the `is_*` flags reflect the acting
//! user's relations and are false for anonymous callers.

use chrono::DateTime;
use potluck_core::{Recipe, RecipeFilter, RecipeStore, RelationKind, User};

use crate::{
    error::{AppError, Result},
    models::{
        catalog::TagResponse,
        recipe::{RecipeIngredientResponse, RecipeResponse, RecipeShortResponse},
        user::{SubscriptionResponse, UserResponse},
    },
};

async fn related(
    store: &dyn RecipeStore,
    kind: RelationKind,
    viewer: Option<&str>,
    target_id: &str,
) -> Result<bool> {
    match viewer {
        Some(viewer) => Ok(store.has_relation(kind, viewer, target_id).await?),
        None => Ok(false),
    }
}

pub async fn user_view(
    store: &dyn RecipeStore,
    viewer: Option<&str>,
    user: User,
) -> Result<UserResponse> {
    let is_subscribed = related(store, RelationKind::Subscription, viewer, &user.user_id).await?;
    Ok(UserResponse::new(user, is_subscribed))
}

/// RFC 3339 form of the stored creation time
fn pub_date(recipe: &Recipe) -> Result<String> {
    DateTime::from_timestamp_micros(recipe.created_at)
        .map(|at| at.to_rfc3339())
        .ok_or_else(|| {
            AppError::Internal(format!(
                "recipe {} has an out-of-range created_at {}",
                recipe.recipe_id, recipe.created_at
            ))
        })
}

pub async fn recipe_view(
    store: &dyn RecipeStore,
    viewer: Option<&str>,
    recipe: Recipe,
) -> Result<RecipeResponse> {
    let author = store
        .get_user(&recipe.author_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("recipe {} has no author", recipe.recipe_id)))?;
    let author = user_view(store, viewer, author).await?;

    let mut tags = Vec::with_capacity(recipe.tags.len());
    for tag_id in &recipe.tags {
        if let Some(tag) = store.get_tag(tag_id).await? {
            tags.push(TagResponse::from(tag));
        }
    }

    let ingredients = store
        .ingredient_rows(&recipe)
        .await?
        .into_iter()
        .map(|row| RecipeIngredientResponse {
            id: row.ingredient_id,
            name: row.name,
            measurement_unit: row.measurement_unit,
            amount: row.amount,
        })
        .collect();

    let is_favorited = related(store, RelationKind::Favorite, viewer, &recipe.recipe_id).await?;
    let is_in_shopping_cart =
        related(store, RelationKind::ShoppingCart, viewer, &recipe.recipe_id).await?;
    let pub_date = pub_date(&recipe)?;

    Ok(RecipeResponse {
        id: recipe.recipe_id,
        author,
        name: recipe.name,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        tags,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        pub_date,
    })
}

/// Followed author with their newest recipes, truncated to `recipes_limit`
pub async fn subscription_view(
    store: &dyn RecipeStore,
    viewer: &str,
    author: User,
    recipes_limit: Option<usize>,
) -> Result<SubscriptionResponse> {
    let filter = RecipeFilter {
        author_id: Some(author.user_id.clone()),
        ..Default::default()
    };
    let recipes = store.list_recipes(&filter).await?;
    let recipes_count = recipes.len();
    let limit = recipes_limit.unwrap_or(recipes_count);

    Ok(SubscriptionResponse {
        user: user_view(store, Some(viewer), author).await?,
        recipes: recipes
            .iter()
            .take(limit)
            .map(RecipeShortResponse::from)
            .collect(),
        recipes_count,
    })
}
