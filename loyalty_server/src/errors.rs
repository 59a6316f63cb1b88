use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use loyalty_engine::{CancellationError, LedgerError, SyncError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Invalid query. {0}")]
    InvalidQuery(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Order conversion error. {0}")]
    OrderConversionError(#[from] OrderConversionError),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Shopify is unavailable. Please try again later. {0}")]
    UpstreamUnavailable(String),
    #[error("The ledger could not be saved. Please try again. {0}")]
    LedgerWriteRejected(String),
    #[error("{0}")]
    AlreadyRewarded(String),
    #[error("The customer's ledger is inconsistent and cannot be updated. {0}")]
    LedgerCorrupted(String),
    #[error("{0}")]
    CancellationRefused(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::CancellationRefused(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyRewarded(_) => StatusCode::CONFLICT,
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::LedgerWriteRejected(_) => StatusCode::BAD_GATEWAY,
            Self::OrderConversionError(_) => StatusCode::BAD_GATEWAY,
            Self::LedgerCorrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Error)]
#[error("Could not convert the Shopify order. {0}.")]
pub struct OrderConversionError(pub String);

impl From<SyncError> for ServerError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::CustomerNotFound(email) => Self::NoRecordFound(format!("Customer not found: {email}")),
            SyncError::UpstreamUnavailable(s) => Self::UpstreamUnavailable(s),
            SyncError::WriteRejected(s) => Self::LedgerWriteRejected(s),
            SyncError::InvalidOrderData(s) => Self::OrderConversionError(OrderConversionError(s)),
            SyncError::StoreError(s) => Self::BackendError(s),
            SyncError::Ledger(e @ LedgerError::AlreadyRewarded(_)) => Self::AlreadyRewarded(e.to_string()),
            SyncError::Ledger(e @ LedgerError::InvalidRules(_)) => Self::ConfigurationError(e.to_string()),
            SyncError::Ledger(e) => Self::LedgerCorrupted(e.to_string()),
        }
    }
}

impl From<CancellationError> for ServerError {
    fn from(e: CancellationError) -> Self {
        match e {
            CancellationError::Refused(r) => Self::CancellationRefused(r.to_string()),
            CancellationError::OrderNotFound(id) => Self::NoRecordFound(format!("Order not found: {id}")),
            CancellationError::UpstreamUnavailable(s) => Self::UpstreamUnavailable(s),
            CancellationError::InvalidOrderData(s) => Self::OrderConversionError(OrderConversionError(s)),
        }
    }
}
