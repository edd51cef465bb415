use thiserror::Error;

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource, or resource type, does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote service rejected or failed the request.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The remote service did not respond in time.
    #[error("timed out: {0}")]
    Timeout(String),

    /// A network or transport-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The provider was given invalid configuration or lookup parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The remote service rejected the request due to rate limiting.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The lookup criteria matched nothing.
    #[error("no match: {0}")]
    NoMatch(String),

    /// The lookup criteria matched more than one candidate and no tie-break
    /// resolved it.
    #[error("ambiguous match: {0}")]
    Ambiguous(String),
}

impl ProviderError {
    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(_) | Self::RateLimited(_)
        )
    }

    /// Returns `true` if the caller can fix the error by changing the lookup
    /// criteria.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::NoMatch(_) | Self::Ambiguous(_) | Self::Configuration(_)
        )
    }
}
