use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON body of every error response.
///
/// ```json
/// { "error": "Upstream request failed", "details": "connection refused" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Short, human-readable summary.
    pub error: String,

    /// Upstream body or failure reason, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Crea un envelope sin detalles.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}
