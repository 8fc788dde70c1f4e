use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    error::{AppError, Result},
    extract::ValidQuery,
    models::catalog::{IngredientParams, IngredientResponse},
    state::AppState,
};

/// List ingredients, optionally by name prefix
#[utoipa::path(
    get,
    path = "/ingredients",
    params(IngredientParams),
    responses(
        (status = 200, description = "Matching ingredients", body = [IngredientResponse]),
    ),
    tag = "Catalog"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<IngredientParams>,
) -> Result<Json<Vec<IngredientResponse>>> {
    let prefix = params.name.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let ingredients = state.store.list_ingredients(prefix).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// Get an ingredient by ID
#[utoipa::path(
    get,
    path = "/ingredients/{id}",
    params(
        ("id" = String, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient found", body = IngredientResponse),
        (status = 404, description = "Ingredient not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IngredientResponse>> {
    let ingredient = state
        .store
        .get_ingredient(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id}")))?;
    Ok(Json(ingredient.into()))
}
