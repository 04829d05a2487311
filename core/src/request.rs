//! Path/query builders and the shared request helper used by every client.
//!
//! # Design
//! Every client operation is "route + escaped parameters + optional query,
//! then one HTTP call". `RoutePath` and `QueryParams` are the single
//! parameterized builder for the first half; `Requester` performs the second
//! half: it renders the `HttpRequest`, applies the auth injector, calls the
//! transport exactly once, checks the status and deserializes the body.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::dtos::common::BaseResponse;
use crate::error::ApiError;
use crate::http::{AuthInjector, HttpMethod, HttpRequest, HttpResponse, NoAuth, Transport};
use crate::routes;

/// A request path assembled from a route constant, fixed segments and
/// percent-encoded parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath(String);

impl RoutePath {
    pub fn new(route: &str) -> Self {
        Self(route.trim_end_matches('/').to_string())
    }

    /// Append a fixed segment such as `name` or `status`.
    pub fn segment(mut self, segment: &str) -> Self {
        self.0.push('/');
        self.0.push_str(segment);
        self
    }

    /// Append a caller-supplied value as one escaped segment. `/`, spaces and
    /// every other reserved character are percent-encoded.
    pub fn param(mut self, value: impl fmt::Display) -> Self {
        self.0.push('/');
        self.0.push_str(&urlencoding::encode(&value.to_string()));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Query parameters keyed by name; setting a key twice keeps the last value.
/// Encoded in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly `offset` and `limit`.
    pub fn paginated(offset: u32, limit: i32) -> Self {
        Self::new()
            .set(routes::OFFSET, offset)
            .set(routes::LIMIT, limit)
    }

    pub fn set(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Comma-joined `labels` filter; skipped when `labels` is empty.
    pub fn labels<S: AsRef<str>>(self, labels: &[S]) -> Self {
        if labels.is_empty() {
            return self;
        }
        let joined = labels
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(routes::COMMA_SEPARATOR);
        self.set(routes::LABELS, joined)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn encode(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Shared HTTP helper: base URL, transport and authentication for one client.
#[derive(Clone)]
pub struct Requester {
    base_url: String,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthInjector>,
    timeout: Option<Duration>,
}

impl fmt::Debug for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requester")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Requester {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            auth: Arc::new(NoAuth),
            timeout: None,
        }
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthInjector>) -> Self {
        self.auth = auth;
        self
    }

    /// A copy whose requests each carry `timeout`; transport and auth are
    /// shared with `self`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self.clone()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        path: impl AsRef<str>,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        let request = self.build(HttpMethod::Get, path.as_ref(), query, None, None);
        self.send(request)
    }

    pub fn delete<T: DeserializeOwned>(&self, path: impl AsRef<str>) -> Result<T, ApiError> {
        let request = self.build(HttpMethod::Delete, path.as_ref(), &QueryParams::new(), None, None);
        self.send(request)
    }

    pub fn post_json<B, T>(&self, path: impl AsRef<str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Post, path.as_ref(), body)
    }

    pub fn put_json<B, T>(&self, path: impl AsRef<str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Put, path.as_ref(), body)
    }

    /// Upload `file` as the `file` field of a multipart form.
    pub fn post_file<T: DeserializeOwned>(
        &self,
        path: impl AsRef<str>,
        file: &Path,
    ) -> Result<T, ApiError> {
        self.send_file(HttpMethod::Post, path.as_ref(), file)
    }

    pub fn put_file<T: DeserializeOwned>(
        &self,
        path: impl AsRef<str>,
        file: &Path,
    ) -> Result<T, ApiError> {
        self.send_file(HttpMethod::Put, path.as_ref(), file)
    }

    fn send_json<B, T>(&self, method: HttpMethod, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let content_type = ("content-type".to_string(), "application/json".to_string());
        let request = self.build(method, path, &QueryParams::new(), Some(content_type), Some(body));
        self.send(request)
    }

    fn send_file<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        file: &Path,
    ) -> Result<T, ApiError> {
        let contents = std::fs::read_to_string(file).map_err(|e| {
            ApiError::InvalidRequest(format!("failed to read {}: {e}", file.display()))
        })?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let boundary = format!("----iot-client-{}", Uuid::new_v4().simple());
        let body = multipart_body(&boundary, &file_name, &contents);
        let content_type = (
            "content-type".to_string(),
            format!("multipart/form-data; boundary={boundary}"),
        );
        let request = self.build(method, path, &QueryParams::new(), Some(content_type), Some(body));
        self.send(request)
    }

    fn build(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        content_type: Option<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{}", self.base_url, path),
            query: query.encode(),
            headers: content_type.into_iter().collect(),
            body,
            timeout: self.timeout,
        }
    }

    fn send<T: DeserializeOwned>(&self, mut request: HttpRequest) -> Result<T, ApiError> {
        self.auth.inject(&mut request)?;
        let method = request.method;
        let url = request.url();
        tracing::debug!(method = method.as_str(), %url, "sending request");

        let response = self.transport.execute(request)?;
        parse_response(&response).inspect_err(|err| {
            tracing::debug!(method = method.as_str(), %url, status = response.status, %err, "request failed");
        })
    }
}

/// Map a response onto the expected payload or a classified error.
fn parse_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::from_status(
            response.status,
            error_message(&response.body),
        ));
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// The platform reports failures as a `BaseResponse` with a `message`; fall
/// back to the raw body for anything else.
fn error_message(body: &str) -> String {
    serde_json::from_str::<BaseResponse>(body)
        .ok()
        .map(|base| base.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

fn multipart_body(boundary: &str, file_name: &str, contents: &str) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\
         \r\n\
         {contents}\r\n\
         --{boundary}--\r\n",
        field = routes::UPLOAD_FILE_FIELD,
    )
}
