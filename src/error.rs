use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::money::Money;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Errors surfaced by the ledger core and the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Validation(String),
    #[error("insufficient funds: balance {balance}, price {price}")]
    InsufficientFunds { balance: Money, price: Money },
    #[error("{name} is out of stock")]
    OutOfStock { name: String },
    #[error("invalid credentials")]
    Unauthorized,
    #[error("admin privileges required")]
    Forbidden,
    #[error("database error")]
    Database(#[from] sqlx::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Validation(_) => "VALIDATION",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::OutOfStock { .. } => "OUT_OF_STOCK",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Database(_) | Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::InvalidState(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientFunds { .. } | Self::OutOfStock { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a unique-index violation to [`AppError::Conflict`], anything else to
    /// [`AppError::Database`].
    pub(crate) fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(message.into())
            }
            _ => Self::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Database(e) => tracing::error!(error = %e, kind = "INTERNAL", "database error"),
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
