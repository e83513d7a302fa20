use std::fmt;

use crate::{AdsApiError, Result};

/// OAuth consumer and access token pair used by a [`Signer`](crate::Signer).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    /// Reads credentials from the environment.
    ///
    /// Reads:
    /// - `ADSAPI_CONSUMER_KEY`
    /// - `ADSAPI_CONSUMER_SECRET`
    /// - `ADSAPI_ACCESS_TOKEN`
    /// - `ADSAPI_ACCESS_TOKEN_SECRET`
    ///
    /// Returns [`AdsApiError::Config`] if any variable is missing or blank.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use adsapi_http::Credentials;
    ///
    /// let credentials = Credentials::from_env().expect("missing ADSAPI_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| -> Result<String> {
            let value = lookup(name).ok_or_else(|| {
                AdsApiError::Config(format!("missing {name} environment variable"))
            })?;
            if value.trim().is_empty() {
                return Err(AdsApiError::Config(format!("{name} is set but empty")));
            }
            Ok(value.trim().to_owned())
        };

        Ok(Self {
            consumer_key: read("ADSAPI_CONSUMER_KEY")?,
            consumer_secret: read("ADSAPI_CONSUMER_SECRET")?,
            access_token: read("ADSAPI_ACCESS_TOKEN")?,
            access_token_secret: read("ADSAPI_ACCESS_TOKEN_SECRET")?,
        })
    }
}
