//! HTTP transport used by the client.
//!
//! The client only ever issues `POST` requests and only looks at the status
//! code and the body text of the answer. [`Transport`] is that narrow seam;
//! [`HttpTransport`] implements it on top of `reqwest`.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Method;

use crate::error::Result;

/// A `POST` request as built by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// Full request URL, query string included.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(&'static str, String)>,
    /// Request body.
    pub body: String,
}

impl HttpRequest {
    /// Create a request without headers.
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Get the first value of a header, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one `POST` and returns the status and body.
///
/// Connection handling, TLS, timeouts and retries at the socket level are the
/// implementation's business. A non-success status is not an error at this
/// level; the client decides what status each operation expects.
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the complete response.
    fn post(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with a custom reqwest client.
    ///
    /// This allows you to configure timeouts, proxies, etc.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn post(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        async move {
            let mut builder = self.http.request(Method::POST, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(*name, value.as_str());
            }

            let response = builder.body(request.body).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;

            Ok(HttpResponse { status, body })
        }
        .boxed()
    }
}
