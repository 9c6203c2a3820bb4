//! Interpretation of upstream responses.
//!
//! The upstream sometimes reports failures inside a 200 response, e.g.
//! `{"status": false, "msg": "Something went wrong."}`. [`interpret`] turns
//! every raw response into either a usable JSON body or a [`PitchsideError`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PitchsideError, Result};
use crate::request::UpstreamResponse;

/// Marker identifying a failure disguised as a successful response.
///
/// A body matches when `flag_field` is boolean `false` and `message_field`
/// equals `message` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftFailureMarker {
    /// Boolean field signalling success.
    pub flag_field: String,
    /// Field carrying the failure message.
    pub message_field: String,
    /// The fixed failure message.
    pub message: String,
}

impl Default for SoftFailureMarker {
    fn default() -> Self {
        Self {
            flag_field: "status".to_string(),
            message_field: "msg".to_string(),
            message: "Something went wrong.".to_string(),
        }
    }
}

impl SoftFailureMarker {
    /// Returns true if the body carries the failure marker.
    pub fn matches(&self, body: &Value) -> bool {
        let flag_is_false = body.get(&self.flag_field) == Some(&Value::Bool(false));
        let message_matches =
            body.get(&self.message_field).and_then(Value::as_str) == Some(self.message.as_str());

        flag_is_false && message_matches
    }
}

/// Converts a raw upstream response into a JSON body or an error.
///
/// - non-2xx: [`PitchsideError::UpstreamStatus`] with the body as details when it parses
/// - 2xx, body not JSON: [`PitchsideError::InvalidBody`]
/// - 2xx, body matches `marker`: [`PitchsideError::UpstreamSoftFailure`]
///
/// ```
/// use pitchside_core::{interpret, SoftFailureMarker, UpstreamResponse};
///
/// let response = UpstreamResponse::new(200, "OK", r#"{"matches": []}"#);
/// let body = interpret(response, &SoftFailureMarker::default()).unwrap();
/// assert!(body["matches"].is_array());
/// ```
pub fn interpret(response: UpstreamResponse, marker: &SoftFailureMarker) -> Result<Value> {
    if !response.is_success() {
        return Err(PitchsideError::UpstreamStatus {
            status: response.status,
            status_text: response.status_text,
            details: serde_json::from_slice(&response.body).ok(),
        });
    }

    let body: Value = serde_json::from_slice(&response.body)
        .map_err(|e| PitchsideError::invalid_body(e.to_string()))?;

    if marker.matches(&body) {
        return Err(PitchsideError::UpstreamSoftFailure { body });
    }

    Ok(body)
}
