//! HTTP testing client and response utilities
//!
//! Provides a fluent API for making HTTP requests in tests and
//! assertions for validating responses. Assertions return errors instead
//! of panicking so a runner can record a failure and keep going.

use reqwest::Method;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::assertions::json_contains;
use crate::config::{SuiteConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport};
use crate::{TestError, TestResult};

/// HTTP test client for making requests in tests
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    headers: HashMap<String, String>,
    transport: Arc<dyn HttpTransport>,
}

impl TestClient {
    /// Create a client for the default local service
    pub fn new() -> TestResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a test client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> TestResult<Self> {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT)?;
        Ok(Self::with_transport(base_url, Arc::new(transport)))
    }

    /// Create a client from a validated suite configuration
    pub fn from_config(config: &SuiteConfig) -> TestResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(&config.base_url, Arc::new(transport)))
    }

    /// Create a client on top of any transport
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            base_url: base_url.into(),
            headers,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set a header for all requests
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Make a GET request
    pub fn get(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::GET, path.into())
    }

    /// Make a POST request
    pub fn post(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::POST, path.into())
    }

    /// Make a PUT request
    pub fn put(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::PUT, path.into())
    }

    /// Make a PATCH request
    pub fn patch(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::PATCH, path.into())
    }

    /// Make a DELETE request
    pub fn delete(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::DELETE, path.into())
    }

    /// Join the base URL, a path, escaped path segments and query parameters
    fn resolve_url(
        &self,
        path: &str,
        segments: &[String],
        query: &[(String, String)],
    ) -> TestResult<String> {
        let base = self.base_url.trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };

        let mut url = Url::parse(&joined)?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| TestError::Setup(format!("URL cannot take path segments: {}", joined)))?
                .pop_if_empty()
                .extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.to_string())
    }
}

impl fmt::Debug for TestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClient")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Request builder for fluent API
pub struct RequestBuilder {
    client: TestClient,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    body: Option<String>,
    segments: Vec<String>,
    query_params: Vec<(String, String)>,
    error: Option<TestError>,
}

impl RequestBuilder {
    fn new(client: TestClient, method: Method, path: String) -> Self {
        Self {
            client,
            method,
            path,
            headers: HashMap::new(),
            body: None,
            segments: Vec::new(),
            query_params: Vec::new(),
            error: None,
        }
    }

    /// Set a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set JSON body for the request
    pub fn json<T: serde::Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_string(data) {
            Ok(json_str) => {
                self.body = Some(json_str);
                self.header("Content-Type", "application/json")
            }
            Err(e) => {
                self.error = Some(e.into());
                self
            }
        }
    }

    /// Set plain text body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append one path segment, percent-encoding `/`, `?`, `#` and friends
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Add query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Resolve the request without sending it
    pub fn build(self) -> TestResult<(Arc<dyn HttpTransport>, ApiRequest)> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let url = self.client
            .resolve_url(&self.path, &self.segments, &self.query_params)?;
        let mut headers = self.client.headers.clone();
        headers.extend(self.headers);

        let request = ApiRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
        };
        Ok((self.client.transport, request))
    }

    /// Send the request and return a test response
    pub async fn send(self) -> TestResult<TestResponse> {
        let (transport, request) = self.build()?;
        transport.execute(request).await
    }
}

/// Test response wrapper with assertion methods
#[derive(Debug, Clone, PartialEq)]
pub struct TestResponse {
    status_code: u16,
    headers: HashMap<String, String>,
    body: String,
}

impl TestResponse {
    pub fn new(status_code: u16, headers: HashMap<String, String>, body: String) -> Self {
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Get the response status code
    pub fn status(&self) -> u16 {
        self.status_code
    }

    /// Get response headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Get response body as string
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Get response body as JSON
    pub fn json(&self) -> TestResult<JsonValue> {
        serde_json::from_str(&self.body).map_err(|e| {
            TestError::assertion(format!(
                "Expected JSON body ({}), got: {}",
                e,
                display_body(&self.body)
            ))
        })
    }

    /// Assert the response status code
    pub fn assert_status(self, expected_status: u16) -> TestResult<Self> {
        if self.status_code != expected_status {
            return Err(TestError::UnexpectedStatus {
                expected: expected_status,
                actual: self.status_code,
                body: display_body(&self.body),
            });
        }
        Ok(self)
    }

    /// Assert the response status is successful (2xx)
    pub fn assert_success(self) -> TestResult<Self> {
        if !(200..300).contains(&self.status_code) {
            return Err(TestError::assertion(format!(
                "Expected successful status, got {} (body: {})",
                self.status_code,
                display_body(&self.body)
            )));
        }
        Ok(self)
    }

    /// Assert the response carries no body content
    pub fn assert_empty_body(self) -> TestResult<Self> {
        if !self.body.trim().is_empty() {
            return Err(TestError::assertion(format!(
                "Expected empty body, got: {}",
                self.body
            )));
        }
        Ok(self)
    }

    /// Assert response header value
    pub fn assert_header(self, name: &str, expected_value: &str) -> TestResult<Self> {
        match self.header(name) {
            Some(value) if value == expected_value => Ok(self),
            Some(value) => Err(TestError::assertion(format!(
                "Expected header '{}' to be '{}', got '{}'",
                name, expected_value, value
            ))),
            None => Err(TestError::assertion(format!(
                "Expected header '{}' not found",
                name
            ))),
        }
    }

    /// Assert JSON response contains specific fields/values
    pub fn assert_json_contains(self, expected: JsonValue) -> TestResult<Self> {
        let actual_json = self.json()?;

        if !json_contains(&actual_json, &expected) {
            return Err(TestError::assertion(format!(
                "Expected JSON to contain: {}, got: {}",
                expected, actual_json
            )));
        }

        Ok(self)
    }

    /// Assert JSON response is an array
    pub fn assert_json_array(self) -> TestResult<Self> {
        if !self.json()?.is_array() {
            return Err(TestError::UnexpectedShape {
                expected: "array".to_string(),
                body: display_body(&self.body),
            });
        }
        Ok(self)
    }
}

/// Render a body for failure messages
fn display_body(body: &str) -> String {
    if body.is_empty() {
        "<empty>".to_string()
    } else {
        body.to_string()
    }
}
