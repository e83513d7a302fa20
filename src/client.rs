use std::fmt;
use std::sync::Arc;

use crate::{
    error::{translate, ErrorFactory, StatusErrorFactory},
    retry::execute_with_policy,
    trace::{AttemptTrace, TraceLogger, TracingLogger},
    transport::{ReqwestTransport, Transport},
    ClientOptions, Credentials, Method, Request, RequestOptions, Response, Result, Signer,
};

/// Signed, retrying client for the Ads API.
///
/// Cloning is cheap; clones share the transport, signer, logger and error
/// factory.
pub struct AdsApiClient<T = ReqwestTransport> {
    transport: Arc<T>,
    credentials: Credentials,
    signer: Arc<dyn Signer>,
    logger: Arc<dyn TraceLogger>,
    errors: Arc<dyn ErrorFactory>,
    options: ClientOptions,
}

impl<T> Clone for AdsApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: self.credentials.clone(),
            signer: Arc::clone(&self.signer),
            logger: Arc::clone(&self.logger),
            errors: Arc::clone(&self.errors),
            options: self.options.clone(),
        }
    }
}

impl<T> fmt::Debug for AdsApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdsApiClient")
            .field("credentials", &self.credentials)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AdsApiClient<ReqwestTransport> {
    /// Creates a client using the default `reqwest` transport.
    pub fn new(credentials: Credentials, signer: impl Signer + 'static) -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::default()),
            credentials,
            signer: Arc::new(signer),
            logger: Arc::new(TracingLogger),
            errors: Arc::new(StatusErrorFactory),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client with credentials read by [`Credentials::from_env`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use adsapi_http::{AdsApiClient, Credentials, Request, Result, Signer};
    ///
    /// struct Passthrough;
    ///
    /// impl Signer for Passthrough {
    ///     fn sign(&self, request: Request, _: &Credentials, _: &str) -> Result<Request> {
    ///         Ok(request)
    ///     }
    /// }
    ///
    /// let client = AdsApiClient::from_env(Passthrough).expect("missing ADSAPI_* env vars");
    /// ```
    pub fn from_env(signer: impl Signer + 'static) -> Result<Self> {
        Ok(Self::new(Credentials::from_env()?, signer))
    }
}

impl<T: Transport> AdsApiClient<T> {
    /// Replaces the transport, keeping every other setting.
    pub fn with_transport<U: Transport>(self, transport: U) -> AdsApiClient<U> {
        AdsApiClient {
            transport: Arc::new(transport),
            credentials: self.credentials,
            signer: self.signer,
            logger: self.logger,
            errors: self.errors,
            options: self.options,
        }
    }

    /// Applies sandbox, trace and retry settings.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_logger(mut self, logger: impl TraceLogger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn with_error_factory(mut self, factory: impl ErrorFactory + 'static) -> Self {
        self.errors = Arc::new(factory);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Builds, signs and executes one call.
    ///
    /// `method` must be one of GET, POST, PUT or DELETE (any case). The
    /// request is signed once and replayed unchanged on every retry. A final
    /// status of 400 or above is returned as
    /// [`AdsApiError::Api`](crate::AdsApiError::Api).
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let request = Request::build(method, path, &options, self.options.sandbox)?;
        let domain = request.domain.clone();
        let request = self.signer.sign(request, &self.credentials, &domain)?;

        let trace = AttemptTrace::new(self.logger.as_ref(), self.options.trace, &domain);
        let response =
            execute_with_policy(self.transport.as_ref(), &request, &self.options.retry, &trace)
                .await?;
        translate(response, self.errors.as_ref())
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::Get.as_str(), path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::Post.as_str(), path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::Put.as_str(), path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::Delete.as_str(), path, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::AdsApiClient;
    use crate::{Credentials, Request, Result, Signer};

    struct Passthrough;

    impl Signer for Passthrough {
        fn sign(&self, request: Request, _: &Credentials, _: &str) -> Result<Request> {
            Ok(request)
        }
    }

    #[test]
    fn debug_redacts_credentials() {
        let client = AdsApiClient::new(
            Credentials::new("ck", "consumer-secret", "at", "token-secret"),
            Passthrough,
        );
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("consumer-secret"));
        assert!(!debug.contains("token-secret"));
    }
}
