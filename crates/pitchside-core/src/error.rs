//! Error types for Pitchside.
//!
//! Every failure the proxy can surface to a caller is a variant of
//! [`PitchsideError`]. The HTTP layer converts each variant into the JSON
//! error envelope; nothing here knows about HTTP frameworks, so status codes
//! are plain `u16` values.
//!
//! # Example
//!
//! ```
//! use pitchside_core::{PitchsideError, Result};
//!
//! fn require_match_id(id: Option<&str>) -> Result<&str> {
//!     id.ok_or_else(|| PitchsideError::missing_parameter("match_id"))
//! }
//!
//! let error = require_match_id(None).unwrap_err();
//! assert!(error.is_validation_error());
//! assert_eq!(error.status_code(), 400);
//! ```

use serde_json::Value;
use thiserror::Error;

/// Status used when the upstream reports a failure inside a 2xx response.
pub const BAD_GATEWAY: u16 = 502;

/// Status used for configuration and transport failures.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Status used for rejected caller input.
pub const BAD_REQUEST: u16 = 400;

/// Main error type for Pitchside operations.
#[derive(Debug, Error)]
pub enum PitchsideError {
    /// The upstream access token is not configured.
    #[error("upstream access token is not configured")]
    MissingToken,

    /// Configuration is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required request parameter was absent or blank.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status} {status_text}")]
    UpstreamStatus {
        /// Status code returned by the upstream.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
        /// Upstream error body, when it was valid JSON.
        details: Option<Value>,
    },

    /// The upstream answered 2xx but flagged the payload as a failure.
    #[error("upstream reported a failure in a successful response")]
    UpstreamSoftFailure {
        /// The upstream body, passed through verbatim.
        body: Value,
    },

    /// The request never produced an upstream response.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The upstream response body could not be used.
    #[error("upstream returned an unusable body: {0}")]
    InvalidBody(String),
}

impl PitchsideError {
    /// Creates an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates a MissingParameter error.
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Creates a Transport error.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport(reason.into())
    }

    /// Creates an InvalidBody error.
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::InvalidBody(reason.into())
    }

    /// HTTP status a caller should receive for this error.
    ///
    /// ```
    /// use pitchside_core::PitchsideError;
    ///
    /// let error = PitchsideError::UpstreamStatus {
    ///     status: 404,
    ///     status_text: "Not Found".into(),
    ///     details: None,
    /// };
    /// assert_eq!(error.status_code(), 404);
    /// assert_eq!(PitchsideError::MissingToken.status_code(), 500);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) => BAD_REQUEST,
            Self::UpstreamStatus { status, .. } => *status,
            Self::UpstreamSoftFailure { .. } => BAD_GATEWAY,
            Self::MissingToken
            | Self::InvalidConfig(_)
            | Self::Transport(_)
            | Self::InvalidBody(_) => INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if the caller supplied bad input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::MissingParameter(_))
    }

    /// Returns true if this is a configuration problem on our side.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingToken | Self::InvalidConfig(_))
    }

    /// Returns true if the upstream was reached and answered with a failure.
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. } | Self::UpstreamSoftFailure { .. }
        )
    }
}

/// Type alias for Results with PitchsideError.
pub type Result<T> = std::result::Result<T, PitchsideError>;
