use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("error fetching SSM parameter '{name}': {message}")]
    CredentialFetch { name: String, message: String },

    #[error("SSM parameter '{0}' has no value")]
    MissingParameterValue(String),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid {0} header value")]
    InvalidHeader(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

pub type Result<T> = std::result::Result<T, CleanupError>;
