//! Outbound request and response values.
//!
//! An [`UpstreamRequest`] is fully resolved but token-free: the upstream
//! client is the only place that knows the base URL and the access token.

use serde::{Deserialize, Serialize};

/// How a request is sent to the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamMethod {
    /// Plain GET, parameters in path and query.
    #[default]
    Get,
    /// POST with an `application/x-www-form-urlencoded` body.
    PostForm,
}

/// A resolved request against the upstream, relative to its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// HTTP method.
    pub method: UpstreamMethod,
    /// Path relative to the base URL, always starting with `/`.
    pub path: String,
    /// Query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Form fields for [`UpstreamMethod::PostForm`].
    pub form: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Creates a GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: UpstreamMethod::Get,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    /// Creates a form POST request for the given path.
    pub fn post_form(path: impl Into<String>) -> Self {
        Self {
            method: UpstreamMethod::PostForm,
            ..Self::get(path)
        }
    }

    /// Adds a query pair.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a form field.
    pub fn with_form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }
}

/// Raw upstream response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status (may be empty).
    pub status_text: String,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Creates a new response.
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Creates a 200 response carrying the given JSON value.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200, "OK", value.to_string())
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
