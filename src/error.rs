//! Error types for the product cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures raised by the cache store itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key or value rejected by validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store is at capacity and nothing could be swept
    #[error("Cache full: {0}")]
    CacheFull(String),
}

// == Repository Error Enum ==
/// Failures raised by the product data access layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Backing store could not be reached
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    /// Record could not be stored or read back as a valid product
    #[error("Malformed record: {0}")]
    Malformed(String),
}

// == Service Error Enum ==
/// Unified error type for the lookup service and HTTP layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Product does not exist
    #[error("Product not found: {0}")]
    NotFound(i64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Data access failure, passed through unchanged
    #[error(transparent)]
    DataAccess(#[from] RepositoryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::DataAccess(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result type for cache store operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Result type for data access operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, ServiceError>;
