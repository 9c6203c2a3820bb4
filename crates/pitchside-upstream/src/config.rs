//! Upstream client configuration.

use std::time::Duration;

use pitchside_core::{PitchsideError, Result, UpstreamRequest};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Where the access token goes on every outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenPlacement {
    /// Appended as the final path segment: `/match/7/info/<token>`.
    PathSegment,
    /// Sent as a query parameter: `/match/7/info?apikey=<token>`.
    Query { name: String },
}

impl Default for TokenPlacement {
    fn default() -> Self {
        Self::Query {
            name: "apikey".to_string(),
        }
    }
}

/// Configuration for the upstream HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL every request path is appended to.
    base_url: String,

    /// Access token. Absence is reported per request, not at startup.
    #[serde(default, skip_serializing)]
    token: Option<String>,

    /// Where the token is placed.
    #[serde(default)]
    token_placement: TokenPlacement,

    /// Request timeout.
    #[serde(default = "default_timeout", rename = "timeout_secs", with = "seconds")]
    timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl UpstreamConfig {
    /// Creates a new builder for UpstreamConfig.
    pub fn builder() -> UpstreamConfigBuilder {
        UpstreamConfigBuilder::default()
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true if a non-blank token is configured.
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Returns the token placement.
    pub fn token_placement(&self) -> &TokenPlacement {
        &self.token_placement
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Builds the absolute URL for a request, injecting the token.
    ///
    /// # Errors
    ///
    /// - [`PitchsideError::MissingToken`] when no token is configured
    /// - [`PitchsideError::InvalidConfig`] when the result is not a valid URL
    pub fn url_for(&self, request: &UpstreamRequest) -> Result<Url> {
        let token = self.token().ok_or(PitchsideError::MissingToken)?;

        let mut raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        if self.token_placement == TokenPlacement::PathSegment {
            raw = format!("{}/{}", raw.trim_end_matches('/'), urlencoding::encode(token));
        }

        let mut url = Url::parse(&raw).map_err(|e| {
            PitchsideError::invalid_config(format!("invalid upstream url for '{}': {}", request.path, e))
        })?;

        let placement_query = match &self.token_placement {
            TokenPlacement::Query { name } => Some((name.as_str(), token)),
            TokenPlacement::PathSegment => None,
        };
        if !request.query.is_empty() || placement_query.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
            if let Some((name, value)) = placement_query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

/// Builder for UpstreamConfig.
#[derive(Debug, Default)]
pub struct UpstreamConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    token_placement: Option<TokenPlacement>,
    timeout: Option<Duration>,
}

impl UpstreamConfigBuilder {
    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the access token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the access token if present.
    pub fn maybe_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Sets the token placement.
    pub fn token_placement(mut self, placement: TokenPlacement) -> Self {
        self.token_placement = Some(placement);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or not an absolute http(s) URL.
    pub fn build(self) -> Result<UpstreamConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| PitchsideError::invalid_config("upstream base_url is required"))?;
        validate_base_url(&base_url)?;

        Ok(UpstreamConfig {
            base_url,
            token: self.token,
            token_placement: self.token_placement.unwrap_or_default(),
            timeout: self.timeout.unwrap_or_else(default_timeout),
        })
    }
}

/// Checks that a base URL is an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url).map_err(|e| {
        PitchsideError::invalid_config(format!("invalid upstream base_url '{}': {}", base_url, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PitchsideError::invalid_config(format!(
            "upstream base_url must be http or https, got '{}'",
            other
        ))),
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
