use std::future::Future;
use std::time::Duration;

use crate::{Request, Response};

/// Connection-level failure reported by a [`Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Sends one request and returns whatever the server answered.
///
/// Any HTTP status is a successful exchange at this level; only failures to
/// obtain a response belong in the error.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(Duration::from_millis(10_000))
    }
}

impl ReqwestTransport {
    /// Creates a transport with a per-attempt timeout.
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url.clone())
            .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
