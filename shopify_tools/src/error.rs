use thiserror::Error;

use crate::MetafieldUserError;

#[derive(Debug, Error)]
pub enum ShopifyApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Invalid GraphQL query: {0}")]
    InvalidGraphQL(String),
    #[error("GraphQL query failed: {0}")]
    GraphQLError(String),
    #[error("The query returned an empty response")]
    EmptyResponse,
    #[error("Invalid currency amount: {0}")]
    InvalidCurrencyAmount(String),
    #[error("Shopify rejected the update. {}", format_user_errors(.0))]
    UserErrors(Vec<MetafieldUserError>),
}

impl ShopifyApiError {
    /// True for failures where the request may not have reached Shopify, or Shopify could not serve it at the time.
    /// These are safe to retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RestResponseError(_) | Self::EmptyResponse => true,
            Self::QueryError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

fn format_user_errors(errors: &[MetafieldUserError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join(", ")
}
