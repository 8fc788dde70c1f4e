use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use potluck_core::{RecipeFilter, RelationKind, recipe, relation};

use crate::{
    error::{AppError, Result},
    extract::{CurrentUser, MaybeUser, ValidJson, ValidQuery},
    handlers::view,
    models::recipe::{RecipeListParams, RecipeRequest, RecipeResponse, RecipeShortResponse},
    state::AppState,
};

/// List recipes, newest first
#[utoipa::path(
    get,
    path = "/recipes",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Matching recipes", body = [RecipeResponse]),
        (status = 401, description = "Unknown acting user"),
    ),
    tag = "Recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ValidQuery(params): ValidQuery<RecipeListParams>,
) -> Result<Json<Vec<RecipeResponse>>> {
    let mut filter = RecipeFilter {
        author_id: params.author.clone(),
        tag_slugs: params.tag_slugs(),
        ..Default::default()
    };
    if params.favorited_only() || params.in_cart_only() {
        // Relation filters only make sense for a known caller
        let Some(viewer_id) = viewer.id() else {
            return Ok(Json(vec![]));
        };
        if params.favorited_only() {
            filter.favorited_by = Some(viewer_id.to_string());
        }
        if params.in_cart_only() {
            filter.in_cart_of = Some(viewer_id.to_string());
        }
    }

    let store = state.store.as_ref();
    let mut views = vec![];
    for recipe in store.list_recipes(&filter).await? {
        views.push(view::recipe_view(store, viewer.id(), recipe).await?);
    }
    Ok(Json(views))
}

/// Get a recipe by ID
#[utoipa::path(
    get,
    path = "/recipes/{id}",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe found", body = RecipeResponse),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>> {
    let store = state.store.as_ref();
    let recipe = store
        .get_recipe(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;
    Ok(Json(view::recipe_view(store, viewer.id(), recipe).await?))
}

/// Create a recipe authored by the acting user
#[utoipa::path(
    post,
    path = "/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "No acting user"),
    ),
    tag = "Recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    ValidJson(payload): ValidJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>)> {
    let store = state.store.as_ref();
    let created = recipe::create(store, &author.user_id, payload.into()).await?;
    let body = view::recipe_view(store, Some(&author.user_id), created).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// Replace the content of a recipe
#[utoipa::path(
    patch,
    path = "/recipes/{id}",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "No acting user"),
        (status = 403, description = "Acting user is not the author"),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Recipes"
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<RecipeRequest>,
) -> Result<Json<RecipeResponse>> {
    let store = state.store.as_ref();
    let updated = recipe::update(store, &actor.user_id, &id, payload.into()).await?;
    Ok(Json(
        view::recipe_view(store, Some(&actor.user_id), updated).await?,
    ))
}

/// Delete a recipe
#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "No acting user"),
        (status = 403, description = "Acting user is not the author"),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    recipe::delete(state.store.as_ref(), &actor.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn add_recipe_relation(
    state: &AppState,
    kind: RelationKind,
    user_id: &str,
    recipe_id: &str,
) -> Result<(StatusCode, Json<RecipeShortResponse>)> {
    let store = state.store.as_ref();
    relation::add(store, kind, user_id, recipe_id).await?;
    let recipe = store
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {recipe_id}")))?;
    Ok((StatusCode::CREATED, Json(RecipeShortResponse::from(&recipe))))
}

/// Add a recipe to the acting user's favorites
#[utoipa::path(
    post,
    path = "/recipes/{id}/favorite",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeShortResponse),
        (status = 400, description = "Already in favorites"),
        (status = 401, description = "No acting user"),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Recipes"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeShortResponse>)> {
    add_recipe_relation(&state, RelationKind::Favorite, &user.user_id, &id).await
}

/// Remove a recipe from the acting user's favorites
#[utoipa::path(
    delete,
    path = "/recipes/{id}/favorite",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not in favorites"),
        (status = 401, description = "No acting user"),
        (status = 404, description = "Recipe not found"),
    ),
    tag = "Recipes"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    relation::remove(
        state.store.as_ref(),
        RelationKind::Favorite,
        &user.user_id,
        &id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
