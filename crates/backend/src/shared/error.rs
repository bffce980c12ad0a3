use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::error::{ApiErrorBody, ApiErrorDetail};
use thiserror::Error;

/// Ошибки бизнес-операций. Консоль показывает текст ошибки во всплывающем уведомлении.
#[derive(Debug, Error)]
pub enum ErpError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("{entity} code '{code}' already exists")]
    DuplicateCode { entity: &'static str, code: String },

    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    #[error("Cannot remove the last active administrator")]
    LastAdministrator,

    #[error("{0}")]
    InUse(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ErpResult<T> = Result<T, ErpError>;

impl ErpError {
    pub fn validation(message: impl Into<String>) -> Self {
        ErpError::Validation(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErpError::NotFound { .. } => "not_found",
            ErpError::Validation(_) => "validation",
            ErpError::DuplicateCode { .. } => "duplicate_code",
            ErpError::InsufficientStock { .. } => "insufficient_stock",
            ErpError::LastAdministrator => "last_administrator",
            ErpError::InUse(_) => "in_use",
            ErpError::InvalidCredentials => "invalid_credentials",
            ErpError::AccountBlocked => "account_blocked",
            ErpError::Unauthorized => "unauthorized",
            ErpError::Forbidden => "forbidden",
            ErpError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErpError::NotFound { .. } => StatusCode::NOT_FOUND,
            ErpError::Validation(_) => StatusCode::BAD_REQUEST,
            ErpError::DuplicateCode { .. }
            | ErpError::InsufficientStock { .. }
            | ErpError::LastAdministrator
            | ErpError::InUse(_) => StatusCode::CONFLICT,
            ErpError::InvalidCredentials | ErpError::Unauthorized => StatusCode::UNAUTHORIZED,
            ErpError::AccountBlocked | ErpError::Forbidden => StatusCode::FORBIDDEN,
            ErpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ErpError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!("{}: {}", other.code(), other);
                other.to_string()
            }
        };

        let body = ApiErrorBody {
            error: ApiErrorDetail {
                code: self.code().to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
