//! `reqwest`-backed upstream client.

use std::error::Error as StdError;

use async_trait::async_trait;
use pitchside_core::{PitchsideError, Result, UpstreamMethod, UpstreamRequest, UpstreamResponse};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::source::Upstream;

/// Sends requests to the configured cricket-data API.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    config: UpstreamConfig,
}

impl HttpUpstream {
    /// Creates a client with the configured timeout.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pitchside/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PitchsideError::invalid_config(format!("failed to build HTTP client: {}", e)))?;

        if !config.has_token() {
            warn!("Upstream access token is not configured; proxied requests will fail");
        }

        Ok(Self { client, config })
    }
}

/// Flattens a reqwest error and its causes into one message.
///
/// The URL carries the token, so it is stripped before anything is rendered.
fn transport_error(error: reqwest::Error) -> PitchsideError {
    let error = error.without_url();
    let mut message = error.to_string();

    let mut source = StdError::source(&error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    if error.is_timeout() && !message.contains("timed out") {
        message.push_str(": operation timed out");
    }

    PitchsideError::transport(message)
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse> {
        let url = self.config.url_for(request)?;

        debug!(method = ?request.method, path = %request.path, "Sending upstream request");

        let builder = match request.method {
            UpstreamMethod::Get => self.client.get(url),
            UpstreamMethod::PostForm => self.client.post(url).form(&request.form),
        };

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        debug!(
            path = %request.path,
            status = status.as_u16(),
            bytes = body.len(),
            "Upstream responded"
        );

        Ok(UpstreamResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body.to_vec(),
        ))
    }

    fn name(&self) -> &str {
        self.config.base_url()
    }
}
