use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapboxApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("The request timed out after {0} seconds")]
    Timeout(u64),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The response was not in the expected format: {0}")]
    MalformedResponse(String),
}
