//! Recipe authoring
//!
//! The acting user is always passed in explicitly; only the author may change
//! or delete a recipe.

use std::collections::HashSet;

use crate::{
    error::{CoreError, Result},
    store::RecipeStore,
    types::{Recipe, RecipeDraft, new_id, now_micros},
};

pub const MAX_NAME_LEN: usize = 200;

async fn check_draft(store: &dyn RecipeStore, draft: &RecipeDraft) -> Result<()> {
    let name_len = draft.name.trim().chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Recipe name must be 1 to {MAX_NAME_LEN} characters long!"
        )));
    }
    if draft.text.trim().is_empty() {
        return Err(CoreError::Validation("Recipe text must not be empty!".into()));
    }
    if draft.cooking_time < 1 {
        return Err(CoreError::Validation(
            "Cooking time must be at least 1 minute!".into(),
        ));
    }

    if draft.tags.is_empty() {
        return Err(CoreError::Validation("Pick at least one tag!".into()));
    }
    let mut seen = HashSet::new();
    for tag_id in &draft.tags {
        if !seen.insert(tag_id.as_str()) {
            return Err(CoreError::Validation(format!("Tag {tag_id} is listed twice!")));
        }
        if store.get_tag(tag_id).await?.is_none() {
            return Err(CoreError::Validation(format!("Tag {tag_id} does not exist!")));
        }
    }

    if draft.ingredients.is_empty() {
        return Err(CoreError::Validation("Add at least one ingredient!".into()));
    }
    let mut seen = HashSet::new();
    for item in &draft.ingredients {
        if !seen.insert(item.ingredient_id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Ingredient {} is listed twice!",
                item.ingredient_id
            )));
        }
        if item.amount < 1 {
            return Err(CoreError::Validation(
                "Ingredient amount must be at least 1!".into(),
            ));
        }
        if store.get_ingredient(&item.ingredient_id).await?.is_none() {
            return Err(CoreError::Validation(format!(
                "Ingredient {} does not exist!",
                item.ingredient_id
            )));
        }
    }
    Ok(())
}

async fn owned_recipe(store: &dyn RecipeStore, actor_id: &str, recipe_id: &str) -> Result<Recipe> {
    let recipe = store
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("recipe {recipe_id} not found")))?;
    if recipe.author_id != actor_id {
        return Err(CoreError::Forbidden(
            "Only the author may change this recipe!".into(),
        ));
    }
    Ok(recipe)
}

pub async fn create(store: &dyn RecipeStore, author_id: &str, draft: RecipeDraft) -> Result<Recipe> {
    check_draft(store, &draft).await?;

    let recipe = Recipe {
        recipe_id: new_id(),
        author_id: author_id.to_string(),
        name: draft.name.trim().to_string(),
        text: draft.text,
        cooking_time: draft.cooking_time,
        tags: draft.tags,
        ingredients: draft.ingredients,
        created_at: now_micros(),
    };
    let recipe = store.insert_recipe(recipe).await?;
    tracing::info!(recipe_id = %recipe.recipe_id, author_id, "recipe created");
    Ok(recipe)
}

/// Replaces the content of an existing recipe, keeping its id, author and
/// publication time
pub async fn update(
    store: &dyn RecipeStore,
    actor_id: &str,
    recipe_id: &str,
    draft: RecipeDraft,
) -> Result<Recipe> {
    let current = owned_recipe(store, actor_id, recipe_id).await?;
    check_draft(store, &draft).await?;

    let recipe = Recipe {
        name: draft.name.trim().to_string(),
        text: draft.text,
        cooking_time: draft.cooking_time,
        tags: draft.tags,
        ingredients: draft.ingredients,
        ..current
    };
    store.update_recipe(recipe).await
}

pub async fn delete(store: &dyn RecipeStore, actor_id: &str, recipe_id: &str) -> Result<()> {
    owned_recipe(store, actor_id, recipe_id).await?;
    if !store.delete_recipe(recipe_id).await? {
        return Err(CoreError::NotFound(format!("recipe {recipe_id} not found")));
    }
    tracing::info!(recipe_id, actor_id, "recipe deleted");
    Ok(())
}
