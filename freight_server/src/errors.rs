use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use freight_engine::{AccountApiError, MarketplaceError, ValidationError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Missing or invalid identity. {0}")]
    Unauthenticated(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ValidationError(ValidationError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ValidationError(e) => json!({ "error": e.message, "field": e.field }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<MarketplaceError> for ServerError {
    fn from(e: MarketplaceError) -> Self {
        match e {
            MarketplaceError::DatabaseError(s) => {
                error!("💻️ Database error: {s}");
                Self::BackendError(format!("Database error: {s}"))
            },
            MarketplaceError::AccountError(e) => e.into(),
            MarketplaceError::Validation(v) => Self::ValidationError(v),
            MarketplaceError::ProfileNotFound { .. } | MarketplaceError::Forbidden(_) => {
                Self::InsufficientPermissions(e.to_string())
            },
            MarketplaceError::CargoItemNotFound(_) |
            MarketplaceError::CargoOrderNotFound(_) |
            MarketplaceError::TransportOrderNotFound(_) |
            MarketplaceError::ContractNotFound(_) |
            MarketplaceError::WarehouseNotFound(_) => Self::NoRecordFound(e.to_string()),
            MarketplaceError::TransportOrderAlreadyContracted(_) |
            MarketplaceError::CargoOrderAlreadyContracted(_) |
            MarketplaceError::DuplicateEntry(_) => Self::Conflict(e.to_string()),
            MarketplaceError::ContractNumberCollision(_) => {
                error!("💻️ {e}");
                Self::Conflict(e.to_string())
            },
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(s) => {
                error!("💻️ Database error: {s}");
                Self::BackendError(format!("Database error: {s}"))
            },
            AccountApiError::DuplicateAccount(_) => Self::Conflict(e.to_string()),
            AccountApiError::AccountNotFound(_) => Self::NoRecordFound(e.to_string()),
            AccountApiError::ProfileNotFound(_) => Self::InsufficientPermissions(e.to_string()),
            AccountApiError::Validation(v) => Self::ValidationError(v),
        }
    }
}
