/// Errors that can occur while talking to the generative model API
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectorError {
    /// Connection refused, DNS failure or timeout
    #[error("Network error: {0}")]
    Network(String),
    /// Missing or rejected API key (401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Quota exceeded (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),
    /// Provider side failure (5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Any other non-success status
    #[error("HTTP error: {0}")]
    Http(String),
    /// Body could not be understood or carried no answer
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
