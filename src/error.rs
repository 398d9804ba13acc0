use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::ContentKind;

/// Failures of the metadata service façade.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("metadata service request failed: {0}")]
    Remote(#[from] wreq::Error),
    #[error("{kind} {id} not found")]
    NotFound { kind: ContentKind, id: i64 },
}

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of the durable slot backing the watchlist.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read slot {slot}: {source}")]
    Read { slot: String, source: BoxError },
    #[error("failed to write slot {slot}: {source}")]
    Write { slot: String, source: BoxError },
    #[error("slot contents are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: anyhow::Error,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, inner: anyhow::anyhow!(message.into()) }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let status = match err {
            CatalogError::Remote(_) => StatusCode::BAD_GATEWAY,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
        };
        Self { status, inner: anyhow::Error::new(err) }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self { status: rejection.status(), inner: anyhow::anyhow!(rejection.body_text()) }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, inner: anyhow::Error::new(err) }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, error = %self.inner, "request failed");
        }
        (self.status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
