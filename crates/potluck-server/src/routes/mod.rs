mod catalog;
mod health;
mod recipe;
mod user;

use axum::{Router, http::Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    routes::{catalog::CatalogApi, recipe::RecipeApi, user::UserApi},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/api", api = CatalogApi),
        (path = "/api", api = UserApi),
        (path = "/api", api = RecipeApi),
    ),
    paths(crate::handlers::health::health),
    tags(
        (name = "Health", description = "Health APIs")
    ),
    info(title = "potluck", description = "Recipe sharing and shopping list service")
)]
struct ApiDoc;

fn create_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

pub fn create_routes(state: AppState) -> Router {
    let doc = ApiDoc::openapi();

    let api = Router::new()
        .merge(catalog::create_router())
        .merge(user::create_router())
        .merge(recipe::create_router());

    Router::new()
        .nest("/api", api)
        .merge(health::create_router())
        .layer(create_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc))
}
