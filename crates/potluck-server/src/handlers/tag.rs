use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    error::{AppError, Result},
    models::catalog::TagResponse,
    state::AppState,
};

/// List all tags
#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "All tags in creation order", body = [TagResponse]),
    ),
    tag = "Catalog"
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>> {
    let tags = state.store.list_tags().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Get a tag by ID
#[utoipa::path(
    get,
    path = "/tags/{id}",
    params(
        ("id" = String, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag found", body = TagResponse),
        (status = 404, description = "Tag not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TagResponse>> {
    let tag = state
        .store
        .get_tag(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tag {id}")))?;
    Ok(Json(tag.into()))
}
