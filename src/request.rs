use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use reqwest::Url;

use crate::{domain::resolve_domain, AdsApiError, RequestOptions, Result};

/// HTTP verbs accepted by the Ads API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AdsApiError;

    fn from_str(value: &str) -> Result<Self> {
        [Self::Get, Self::Post, Self::Put, Self::Delete]
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| AdsApiError::Config(format!("unsupported HTTP method '{value}'")))
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// `User-Agent` sent with every request.
///
/// Example: `adsapi-http version: 0.1.0 platform: rust (linux/x86_64)`
pub fn user_agent() -> &'static str {
    static USER_AGENT: OnceLock<String> = OnceLock::new();
    USER_AGENT.get_or_init(|| {
        format!(
            "{} version: {} platform: rust ({}/{})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    })
}

/// A fully assembled outbound call.
///
/// Built once per call and reused unchanged by every attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Resolved domain, e.g. `https://ads-api.twitter.com`.
    pub domain: String,
    /// Resource path, e.g. `/12/accounts`.
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Domain, path and encoded query joined.
    pub url: Url,
}

impl Request {
    /// Builds a request from a method name, resource path and options.
    ///
    /// Fails with [`AdsApiError::Config`] for methods other than
    /// GET, POST, PUT and DELETE, or when the domain and path do not form a
    /// valid URL.
    pub fn build(
        method: &str,
        path: &str,
        options: &RequestOptions,
        sandbox: bool,
    ) -> Result<Self> {
        let method = method.parse::<Method>()?;
        let domain = resolve_domain(options.domain.as_deref(), sandbox).to_owned();

        let mut url = Url::parse(&format!("{domain}{path}"))
            .map_err(|err| AdsApiError::Config(format!("invalid URL '{domain}{path}': {err}")))?;
        if !options.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.params);
        }

        let mut request = Self {
            method,
            domain,
            path: path.to_owned(),
            params: options.params.clone(),
            headers: options.headers.clone(),
            body: options.body.clone(),
            url,
        };
        request.set_header("User-Agent", user_agent());
        Ok(request)
    }

    /// Returns the first header value with a case-insensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Replaces every header named `name` with a single value.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }
}
