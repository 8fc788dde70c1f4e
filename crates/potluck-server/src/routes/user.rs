use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::{
    handlers::user::{
        get_user, list_users, me, register_user, subscribe, subscriptions, unsubscribe,
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user::register_user,
        crate::handlers::user::list_users,
        crate::handlers::user::get_user,
        crate::handlers::user::me,
        crate::handlers::user::subscriptions,
        crate::handlers::user::subscribe,
        crate::handlers::user::unsubscribe,
    ),
    tags(
        (name = "Users", description = "Users and subscriptions")
    ),
)]
pub struct UserApi;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register_user))
        .route("/users/me", get(me))
        .route("/users/subscriptions", get(subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe).delete(unsubscribe))
}
