use axum::{Router, routing::get};
use utoipa::OpenApi;

use crate::{
    handlers::{
        ingredient::{get_ingredient, list_ingredients},
        tag::{get_tag, list_tags},
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::tag::list_tags,
        crate::handlers::tag::get_tag,
        crate::handlers::ingredient::list_ingredients,
        crate::handlers::ingredient::get_ingredient,
    ),
    tags(
        (name = "Catalog", description = "Read-only tag and ingredient catalog")
    ),
)]
pub struct CatalogApi;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
}
