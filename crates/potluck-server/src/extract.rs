//! Acting user resolution
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user id in the `X-User-Id` header and handlers receive the resolved user
//! explicitly.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use potluck_core::User;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

pub const USER_HEADER: &str = "x-user-id";

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<User>> {
    let Some(value) = parts.headers.get(USER_HEADER) else {
        return Ok(None);
    };
    let user_id = value
        .to_str()
        .map(str::trim)
        .map_err(|_| AppError::Unauthorized("Malformed user header!".into()))?;
    if user_id.is_empty() {
        return Ok(None);
    }

    match state.store.get_user(user_id).await? {
        Some(user) => Ok(Some(user)),
        None => Err(AppError::Unauthorized("Invalid credentials!".into())),
    }
}

/// Required acting user; anonymous requests get 401
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication credentials were not provided!".into()))
    }
}

/// Optional acting user for endpoints open to anonymous callers
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|u| u.user_id.as_str())
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        Ok(MaybeUser(resolve(parts, state).await?))
    }
}

/// JSON body that has passed its `validator` rules; malformed bodies are 400
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Query string extractor whose rejections use the JSON error body
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ValidQuery(value))
    }
}
