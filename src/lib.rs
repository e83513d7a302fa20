//! `adsapi-http` executes signed requests against the Ads API.
//!
//! A call goes through four stages:
//! - [`Request::build`] assembles method, URL, headers and body
//! - a [`Signer`] attaches authentication material once
//! - the retry loop runs the request through a [`Transport`], honoring
//!   [`RetryPolicy`] and 429 rate-limit resets
//! - non-success final statuses become [`AdsApiError::Api`]
//!
//! [`AdsApiClient`] wires the stages together.

mod client;
mod credentials;
mod domain;
mod error;
mod options;
mod request;
mod response;
mod retry;
mod sign;
mod trace;
mod transport;

pub use client::AdsApiClient;
pub use credentials::Credentials;
pub use domain::{resolve_domain, PRODUCTION_DOMAIN, SANDBOX_DOMAIN};
pub use error::{AdsApiError, DomainError, ErrorDetail, ErrorFactory, ErrorKind, StatusErrorFactory};
pub use options::{ClientOptions, RequestOptions, RetryPolicy};
pub use request::{user_agent, Method, Request};
pub use response::{RateLimitInfo, Response};
pub use sign::Signer;
pub use trace::{TraceLogger, TracingLogger, REDACTED_BODY};
pub use transport::{ReqwestTransport, Transport, TransportError};

pub type Result<T> = std::result::Result<T, AdsApiError>;
