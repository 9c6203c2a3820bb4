//! The upstream fetch capability.

use async_trait::async_trait;
use pitchside_core::{Result, UpstreamRequest, UpstreamResponse};

/// Something that can send a resolved request to the cricket-data API.
///
/// This is the only seam between Pitchside and the network. The aggregate
/// cache and the pass-through handler both hold an `Arc<dyn Upstream>`, so
/// tests substitute a scripted implementation.
///
/// # Implementors
///
/// - `HttpUpstream` - sends requests with `reqwest`, injecting the access token
///
/// # Example
///
/// ```ignore
/// use pitchside_upstream::Upstream;
///
/// struct Canned(UpstreamResponse);
///
/// #[async_trait]
/// impl Upstream for Canned {
///     async fn send(&self, _request: &UpstreamRequest) -> Result<UpstreamResponse> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Sends one request and returns the raw response.
    ///
    /// Non-success statuses are *responses*, not errors; interpretation is
    /// left to the caller.
    ///
    /// # Errors
    ///
    /// - `PitchsideError::MissingToken` if no access token is configured
    /// - `PitchsideError::Transport` if no response was received
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse>;

    /// Returns the name of this upstream, for logging.
    fn name(&self) -> &str {
        "upstream"
    }
}
