use reqwest::StatusCode;

use crate::{domain::is_api_domain, Request, Response};

/// Logged instead of the body for domains other than the Ads API ones.
pub const REDACTED_BODY: &str = "**OMITTED**";

/// Sink for diagnostic messages.
pub trait TraceLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// [`TraceLogger`] that forwards to `tracing`.
///
/// Messages are discarded when the `tracing` feature is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl TraceLogger for TracingLogger {
    fn info(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::info!("{}", message);
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }

    fn warn(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{}", message);
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }
}

/// Per-call view of the logger used by the retry loop.
pub(crate) struct AttemptTrace<'a> {
    logger: &'a dyn TraceLogger,
    enabled: bool,
    show_body: bool,
}

impl<'a> AttemptTrace<'a> {
    pub(crate) fn new(logger: &'a dyn TraceLogger, enabled: bool, domain: &str) -> Self {
        Self {
            logger,
            enabled,
            show_body: is_api_domain(domain),
        }
    }

    pub(crate) fn warn(&self, message: &str) {
        self.logger.warn(message);
    }

    pub(crate) fn request(&self, request: &Request) {
        if !self.enabled {
            return;
        }
        self.logger.info(&format!(
            "Send: {} {}{} {:?}",
            request.method, request.domain, request.path, request.params
        ));
    }

    pub(crate) fn response(&self, response: &Response) {
        if !self.enabled {
            return;
        }
        let reason = StatusCode::from_u16(response.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("");
        self.logger
            .info(&format!("Status: {} {}", response.status, reason));
        for (name, value) in &response.headers {
            self.logger.info(&format!("Header: {name}: {value}"));
        }
        if self.show_body {
            self.logger.info(&format!("Body: {}", response.body));
        } else {
            self.logger.info(&format!("Body: {REDACTED_BODY}"));
        }
    }
}
