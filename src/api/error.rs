use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A form was submitted with missing fields. No request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("request failed with HTTP {status}")]
    RequestFailed { status: u16, message: Option<String> },

    #[error("booking {id} not found")]
    NotFound { id: String, message: Option<String> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The `message` field the server attached to an error response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { message, .. } | ApiError::NotFound { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// True when the failure happened below HTTP: nothing usable came back.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Decode(_))
    }
}
