use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use potluck_core::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    #[allow(clippy::enum_variant_names)]
    ConfigError(#[from] toml::de::Error),

    #[error("config error: {0}")]
    InvalidConfig(String),

    #[error("validation error: {0}")]
    #[allow(clippy::enum_variant_names)]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("db error: {0}")]
    DbError(#[from] surrealdb::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Core(core) => match core {
                CoreError::Validation(_) | CoreError::Conflict(_) | CoreError::NotPresent(_) => {
                    StatusCode::BAD_REQUEST
                }
                CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::UnitMismatch { .. } => StatusCode::CONFLICT,
                CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::ConfigError(_)
            | AppError::InvalidConfig(_)
            | AppError::DbError(_)
            | AppError::IoError(_)
            | AppError::JsonError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }

        let body = Json(json!({
            "errors": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T, E = AppError> = core::result::Result<T, E>;
