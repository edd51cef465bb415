use strata_provider::ProviderError;
use thiserror::Error;

/// Errors specific to AWS lookups.
#[derive(Debug, Clone, Error)]
pub enum AwsProviderError {
    /// The AWS SDK returned an error from the service.
    #[error("AWS service error: {0}")]
    ServiceError(String),

    /// The request was throttled by the AWS service.
    #[error("AWS request throttled: {0}")]
    Throttled(String),

    /// A network or connection error occurred communicating with AWS.
    #[error("AWS connection error: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("AWS request timed out: {0}")]
    Timeout(String),

    /// The lookup parameters were invalid or missing required fields.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// AWS credential resolution failed.
    #[error("credential error: {0}")]
    CredentialError(String),

    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The service reported that the named resource does not exist.
    #[error("AWS resource not found: {0}")]
    NotFound(String),

    /// No orderable option survived the query and the storage-type filter.
    #[error("no RDS orderable DB instance options found matching criteria; try a different search")]
    NoMatchingOptions,

    /// More than one orderable option matched and no preferred class picked
    /// one of them.
    #[error(
        "multiple RDS DB instance classes ({}) match the criteria; try a different search",
        .0.join(", ")
    )]
    AmbiguousOptions(Vec<String>),
}

impl From<AwsProviderError> for ProviderError {
    fn from(err: AwsProviderError) -> Self {
        match err {
            AwsProviderError::ServiceError(msg) => ProviderError::ExecutionFailed(msg),
            AwsProviderError::Throttled(msg) => ProviderError::RateLimited(msg),
            AwsProviderError::Connection(msg) => ProviderError::Connection(msg),
            AwsProviderError::Timeout(msg) => ProviderError::Timeout(msg),
            AwsProviderError::InvalidPayload(msg)
            | AwsProviderError::CredentialError(msg)
            | AwsProviderError::Configuration(msg) => ProviderError::Configuration(msg),
            AwsProviderError::NotFound(msg) => ProviderError::NotFound(msg),
            err @ AwsProviderError::NoMatchingOptions => ProviderError::NoMatch(err.to_string()),
            err @ AwsProviderError::AmbiguousOptions(_) => {
                ProviderError::Ambiguous(err.to_string())
            }
        }
    }
}

#[cfg(feature = "rds")]
use aws_sdk_rds::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

#[cfg(all(feature = "lex", not(feature = "rds")))]
use aws_sdk_lexmodelbuilding::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Service error codes AWS uses for request throttling.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottled",
    "RequestThrottledException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "LimitExceededException",
];

/// Classify an AWS SDK error into the appropriate [`AwsProviderError`].
///
/// The kind comes from the SDK error variant and the service error code, never
/// from the message text. `context` is prefixed to the rendered error so the
/// failing call stays identifiable.
#[cfg(any(feature = "rds", feature = "lex"))]
pub fn classify_sdk_error<E, R>(err: &SdkError<E, R>, context: &str) -> AwsProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{context}: {}", DisplayErrorContext(err));
    match err {
        SdkError::TimeoutError(_) => AwsProviderError::Timeout(message),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            AwsProviderError::Timeout(message)
        }
        SdkError::DispatchFailure(_) => AwsProviderError::Connection(message),
        SdkError::ServiceError(_)
            if err.code().is_some_and(|code| THROTTLING_CODES.contains(&code)) =>
        {
            AwsProviderError::Throttled(message)
        }
        _ => AwsProviderError::ServiceError(message),
    }
}
