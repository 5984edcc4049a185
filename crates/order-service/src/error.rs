use reqwest::header::InvalidHeaderValue;

/// Failures talking to the Order Service. A malformed 2xx body is not an
/// error, see [`crate::OrderPayload::Malformed`].
#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    #[error("Failed to create header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("{action} failed with status: {status}, body: {body}")]
    RequestFailed {
        action: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Order service unavailable: {message}")]
    Unavailable { message: String },
}
