use std::collections::BTreeSet;

/// Configures retry and rate-limit behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of status-driven retries after the initial attempt.
    pub max_retries: usize,
    /// Delay between retries in milliseconds, slept in whole seconds.
    pub retry_delay_ms: u64,
    /// Statuses that trigger a retry while budget remains.
    pub retry_on_status: BTreeSet<u16>,
    /// Wait for the rate-limit reset once when a 429 is received.
    pub handle_rate_limit: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay_ms: 1_500,
            retry_on_status: BTreeSet::from([500, 503]),
            handle_rate_limit: false,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_retry_on_status<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.retry_on_status = statuses.into_iter().collect();
        self
    }

    pub fn with_rate_limit_handling(mut self, enabled: bool) -> Self {
        self.handle_rate_limit = enabled;
        self
    }
}

/// Client-wide settings shared by every call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClientOptions {
    /// Send requests to the sandbox domain unless a request overrides it.
    pub sandbox: bool,
    /// Log every attempt's request and response.
    pub trace: bool,
    /// Retry and rate-limit behavior.
    pub retry: RetryPolicy,
}

/// Per-call inputs to the request builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Query parameters, encoded in insertion order.
    pub params: Vec<(String, String)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: Option<Vec<u8>>,
    /// Domain used instead of the production/sandbox endpoint.
    pub domain: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientOptions, RequestOptions, RetryPolicy};

    #[test]
    fn retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.retry_delay_ms, 1_500);
        assert!(policy.retry_on_status.contains(&500));
        assert!(policy.retry_on_status.contains(&503));
        assert_eq!(policy.retry_on_status.len(), 2);
        assert!(!policy.handle_rate_limit);
    }

    #[test]
    fn client_options_default_to_production_without_trace() {
        let options = ClientOptions::default();
        assert!(!options.sandbox);
        assert!(!options.trace);
        assert_eq!(options.retry, RetryPolicy::default());
    }

    #[test]
    fn request_options_keep_param_order() {
        let options = RequestOptions::new()
            .param("b", "2")
            .param("a", "1")
            .header("X-Test", "yes");
        assert_eq!(
            options.params,
            vec![
                ("b".to_owned(), "2".to_owned()),
                ("a".to_owned(), "1".to_owned())
            ]
        );
        assert_eq!(options.headers.len(), 1);
        assert!(options.body.is_none());
    }
}
