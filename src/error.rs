use serde::Deserialize;

use crate::{transport::TransportError, Response};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum AdsApiError {
    /// Invalid input rejected before any network activity.
    #[error("configuration error: {0}")]
    Config(String),
    /// The signer refused to sign the request.
    #[error("signing error: {0}")]
    Signing(String),
    /// Connection-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(TransportError),
    /// Final HTTP status was 400 or above.
    #[error(transparent)]
    Api(DomainError),
    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl AdsApiError {
    /// HTTP status of an [`AdsApiError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Classification of a failed response by status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotAuthorized,
    Forbidden,
    NotFound,
    RateLimit,
    ServerError,
    ServiceUnavailable,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::NotAuthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimit,
            500 => Self::ServerError,
            503 => Self::ServiceUnavailable,
            _ => Self::Unknown,
        }
    }
}

/// Single entry of the API's `errors` array.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

/// Terminal non-success response.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("api error {status} ({kind:?}): {body}")]
pub struct DomainError {
    pub kind: ErrorKind,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Structured errors from a JSON body, empty when the body has none.
    pub details: Vec<ErrorDetail>,
    /// `retry-after` seconds, only for rate-limit errors.
    pub retry_after: Option<u64>,
    /// Rate-limit reset epoch seconds, only for rate-limit errors.
    pub reset_at: Option<i64>,
}

impl DomainError {
    pub fn new(kind: ErrorKind, response: Response) -> Self {
        let details = serde_json::from_str::<ErrorEnvelope>(&response.body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default();

        let (retry_after, reset_at) = if kind == ErrorKind::RateLimit {
            (
                response
                    .header("retry-after")
                    .and_then(|value| value.trim().parse().ok()),
                response.rate_limit_reset(),
            )
        } else {
            (None, None)
        };

        Self {
            kind,
            status: response.status,
            headers: response.headers,
            body: response.body,
            details,
            retry_after,
            reset_at,
        }
    }
}

/// Builds the [`DomainError`] for a failed final response.
pub trait ErrorFactory: Send + Sync {
    fn from_response(&self, response: Response) -> DomainError;
}

/// Default factory classifying errors with [`ErrorKind::from_status`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusErrorFactory;

impl ErrorFactory for StatusErrorFactory {
    fn from_response(&self, response: Response) -> DomainError {
        DomainError::new(ErrorKind::from_status(response.status), response)
    }
}

/// Passes responses below 400 through and turns the rest into errors.
pub(crate) fn translate(
    response: Response,
    factory: &dyn ErrorFactory,
) -> Result<Response, AdsApiError> {
    if response.status < 400 {
        return Ok(response);
    }
    Err(AdsApiError::Api(factory.from_response(response)))
}
