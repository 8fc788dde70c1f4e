use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::{
    handlers::{
        recipe::{
            add_favorite, create_recipe, delete_recipe, get_recipe, list_recipes,
            remove_favorite, update_recipe,
        },
        shopping_cart::{add_to_cart, download_shopping_cart, remove_from_cart},
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::recipe::list_recipes,
        crate::handlers::recipe::get_recipe,
        crate::handlers::recipe::create_recipe,
        crate::handlers::recipe::update_recipe,
        crate::handlers::recipe::delete_recipe,
        crate::handlers::recipe::add_favorite,
        crate::handlers::recipe::remove_favorite,
        crate::handlers::shopping_cart::add_to_cart,
        crate::handlers::shopping_cart::remove_from_cart,
        crate::handlers::shopping_cart::download_shopping_cart,
    ),
    tags(
        (name = "Recipes", description = "Recipe authoring and favorites"),
        (name = "Shopping cart", description = "Cart and shopping list download")
    ),
)]
pub struct RecipeApi;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route(
            "/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(add_to_cart).delete(remove_from_cart),
        )
}
