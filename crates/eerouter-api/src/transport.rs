// Transport seam and the reqwest-backed implementation.
//
// Router clients never hold a `reqwest::Client` directly. They build a
// `Request` (method, URL, cookies, optional form body) and hand it to a
// `Transport`, which returns the status and body text. Tests swap in fakes.

use std::future::Future;
use std::time::Duration;

use reqwest::header::COOKIE;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// HTTP method subset used by the router endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outgoing request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    /// Cookies sent as a single `Cookie` header, in order.
    pub cookies: Vec<(String, String)>,
    /// URL-encoded form body (POST only).
    pub form: Option<Vec<(String, String)>>,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            cookies: Vec::new(),
            form: None,
        }
    }

    pub fn post(url: Url) -> Self {
        Self {
            method: Method::Post,
            url,
            cookies: Vec::new(),
            form: None,
        }
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form = Some(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Render the cookies as a `Cookie` header value, if any.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Response status and body text.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTP exchange.
///
/// Network-level failures are returned as `Err`; any HTTP status, including
/// 4xx/5xx, is a successful exchange and comes back as a [`Response`].
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, Error>> + Send;
}

// ── reqwest implementation ───────────────────────────────────────────

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("eerouter/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| Error::Client(e.to_string()))
    }
}

/// [`Transport`] over a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap a pre-built client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        let cookie = request.cookie_header();
        let Request {
            method, url, form, ..
        } = request;

        debug!(?method, %url, "sending request");

        let mut builder = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(ref fields) = form {
            builder = builder.form(fields);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        trace!(status, body_len = body.len(), "received response");
        Ok(Response { status, body })
    }
}
