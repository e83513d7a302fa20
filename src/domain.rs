/// Production Ads API endpoint.
pub const PRODUCTION_DOMAIN: &str = "https://ads-api.twitter.com";

/// Sandbox Ads API endpoint.
pub const SANDBOX_DOMAIN: &str = "https://ads-api-sandbox.twitter.com";

/// Picks the domain a request is sent to.
///
/// An explicit override always wins; otherwise the sandbox flag selects
/// between [`SANDBOX_DOMAIN`] and [`PRODUCTION_DOMAIN`].
pub fn resolve_domain(domain_override: Option<&str>, sandbox: bool) -> &str {
    match domain_override {
        Some(domain) => domain,
        None if sandbox => SANDBOX_DOMAIN,
        None => PRODUCTION_DOMAIN,
    }
}

/// Whether `domain` is one of the two Ads API endpoints.
pub(crate) fn is_api_domain(domain: &str) -> bool {
    domain == PRODUCTION_DOMAIN || domain == SANDBOX_DOMAIN
}
