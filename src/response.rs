use serde::de::DeserializeOwned;

use crate::{AdsApiError, Result};

const ACCOUNT_RATE_LIMIT_PREFIX: &str = "x-account-rate-limit-";
const RATE_LIMIT_PREFIX: &str = "x-rate-limit-";

/// Status, headers and body of one HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Header pairs in the order the transport reported them.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Rate-limit budget advertised by the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Reset time in epoch seconds.
    pub reset: Option<i64>,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first header value with a case-insensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            AdsApiError::Decode(format!("invalid response JSON: {err}; body: {}", self.body))
        })
    }

    /// Reset epoch, preferring the account-level header.
    pub(crate) fn rate_limit_reset(&self) -> Option<i64> {
        self.rate_limit_value("reset")
    }

    /// Reads the account-level rate-limit headers, falling back to the
    /// endpoint-level ones per field.
    pub fn rate_limit(&self) -> RateLimitInfo {
        RateLimitInfo {
            limit: self.rate_limit_value("limit"),
            remaining: self.rate_limit_value("remaining"),
            reset: self.rate_limit_value("reset"),
        }
    }

    fn rate_limit_value<T: std::str::FromStr>(&self, field: &str) -> Option<T> {
        [ACCOUNT_RATE_LIMIT_PREFIX, RATE_LIMIT_PREFIX]
            .iter()
            .find_map(|prefix| self.header(&format!("{prefix}{field}")))
            .and_then(|value| value.trim().parse().ok())
    }
}
