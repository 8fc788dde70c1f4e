use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use potluck_core::{RelationKind, relation, user};

use crate::{
    error::{AppError, Result},
    extract::{CurrentUser, MaybeUser, ValidJson, ValidQuery},
    handlers::view,
    models::user::{
        RegisterUserRequest, SubscriptionParams, SubscriptionResponse, UserResponse,
    },
    state::AppState,
};

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request or duplicate email / username"),
    ),
    tag = "Users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = user::register(state.store.as_ref(), payload.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::new(user, false))))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Unknown acting user"),
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeUser,
) -> Result<Json<Vec<UserResponse>>> {
    let store = state.store.as_ref();
    let mut views = vec![];
    for user in store.list_users().await? {
        views.push(view::user_view(store, viewer.id(), user).await?);
    }
    Ok(Json(views))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let store = state.store.as_ref();
    let user = store
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    Ok(Json(view::user_view(store, viewer.id(), user).await?))
}

/// The acting user
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Acting user", body = UserResponse),
        (status = 401, description = "No acting user"),
    ),
    tag = "Users"
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::new(user, false))
}

/// Users the acting user follows, with their latest recipes
#[utoipa::path(
    get,
    path = "/users/subscriptions",
    params(SubscriptionParams),
    responses(
        (status = 200, description = "Followed users", body = [SubscriptionResponse]),
        (status = 401, description = "No acting user"),
    ),
    tag = "Users"
)]
pub async fn subscriptions(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    ValidQuery(params): ValidQuery<SubscriptionParams>,
) -> Result<Json<Vec<SubscriptionResponse>>> {
    let store = state.store.as_ref();
    let mut views = vec![];
    for author in user::subscriptions(store, &current.user_id).await? {
        views.push(
            view::subscription_view(store, &current.user_id, author, params.recipes_limit).await?,
        );
    }
    Ok(Json(views))
}

/// Subscribe to a user
#[utoipa::path(
    post,
    path = "/users/{id}/subscribe",
    params(
        ("id" = String, Path, description = "User ID"),
        SubscriptionParams,
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Already subscribed, or self-subscription"),
        (status = 401, description = "No acting user"),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
    ValidQuery(params): ValidQuery<SubscriptionParams>,
) -> Result<(StatusCode, Json<SubscriptionResponse>)> {
    let store = state.store.as_ref();
    relation::add(store, RelationKind::Subscription, &current.user_id, &id).await?;

    let author = store
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    let body = view::subscription_view(store, &current.user_id, author, params.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// Unsubscribe from a user
#[utoipa::path(
    delete,
    path = "/users/{id}/subscribe",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed"),
        (status = 401, description = "No acting user"),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    relation::remove(
        state.store.as_ref(),
        RelationKind::Subscription,
        &current.user_id,
        &id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
