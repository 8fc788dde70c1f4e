use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use potluck_core::{RelationKind, relation, shopping};

use crate::{
    error::Result,
    extract::CurrentUser,
    handlers::recipe::add_recipe_relation,
    models::recipe::RecipeShortResponse,
    state::AppState,
};

/// Add a recipe to the acting user's shopping cart
#[utoipa::path(
    post,
    path = "/recipes/{id}/shopping_cart",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeShortResponse),
        (status = 400, description = "Already in the shopping cart"),
        (status = 401, description = "No acting user"),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Shopping cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeShortResponse>)> {
    add_recipe_relation(&state, RelationKind::ShoppingCart, &user.user_id, &id).await
}

/// Remove a recipe from the acting user's shopping cart
#[utoipa::path(
    delete,
    path = "/recipes/{id}/shopping_cart",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 400, description = "Not in the shopping cart"),
        (status = 401, description = "No acting user"),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Shopping cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    relation::remove(
        state.store.as_ref(),
        RelationKind::ShoppingCart,
        &user.user_id,
        &id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download the aggregated shopping list as a text file
#[utoipa::path(
    get,
    path = "/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Shopping list", body = String, content_type = "text/plain"),
        (status = 401, description = "No acting user"),
        (status = 409, description = "Units disagree and strict units are enabled"),
    ),
    tag = "Shopping cart"
)]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let policy = state.shopping_list.unit_policy();
    let lines = shopping::generate(state.store.as_ref(), &user.user_id, policy).await?;
    let body = shopping::render_text(&lines);

    tracing::info!(user_id = %user.user_id, lines = lines.len(), "shopping list downloaded");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.shopping_list.filename
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
