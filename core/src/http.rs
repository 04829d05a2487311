//! HTTP request/response types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The clients build an `HttpRequest`,
//! hand it to a [`Transport`] for the round-trip and interpret the returned
//! `HttpResponse` themselves, so the transport never decides what a status
//! code means. Tests substitute a scripted transport; production code uses
//! [`crate::transport::UreqTransport`].

use std::time::Duration;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL without the query string; `query` holds the
/// already percent-encoded query string (empty when there are no parameters).
/// `timeout` bounds this one exchange; `None` leaves the transport's own
/// limit in charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Full request URL: `path`, plus `?query` when there is one.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// to complete the exchange are `Err` (typically `ApiError::Transport`).
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Adds authentication data to an outgoing request.
pub trait AuthInjector: Send + Sync {
    fn inject(&self, request: &mut HttpRequest) -> Result<(), ApiError>;
}

/// Leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthInjector for NoAuth {
    fn inject(&self, _request: &mut HttpRequest) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Sends a fixed bearer token in the `Authorization` header.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken").field("token", &"<redacted>").finish()
    }
}

impl AuthInjector for BearerToken {
    fn inject(&self, request: &mut HttpRequest) -> Result<(), ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::InvalidRequest("empty bearer token".to_string()));
        }
        request
            .headers
            .push(("authorization".to_string(), format!("Bearer {}", self.token)));
        Ok(())
    }
}
