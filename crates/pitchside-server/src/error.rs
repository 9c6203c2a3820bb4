use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pitchside_core::PitchsideError;
use serde_json::Value;

use crate::cache::CacheError;
use crate::handlers::response::ErrorEnvelope;

/// Errors returned by handlers; every variant renders as `{ error, details? }`.
#[derive(Debug)]
pub enum AppError {
    /// Ruta no encontrada
    NotFound(String),

    /// Parametros invalidos
    BadRequest(String),

    /// The upstream answered, but with a failure
    Upstream {
        status: StatusCode,
        error: String,
        details: Option<Value>,
    },

    /// Error interno
    Internal {
        error: String,
        details: Option<Value>,
    },
}

impl AppError {
    fn internal(error: &str, details: impl Into<String>) -> Self {
        AppError::Internal {
            error: error.to_string(),
            details: Some(Value::String(details.into())),
        }
    }

    /// Status the caller receives.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PitchsideError> for AppError {
    fn from(err: PitchsideError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err {
            PitchsideError::MissingParameter(name) => {
                AppError::BadRequest(format!("Missing required parameter '{}'", name))
            },
            PitchsideError::UpstreamStatus {
                status_text,
                details,
                ..
            } => AppError::Upstream {
                status,
                error: if status_text.is_empty() {
                    "Upstream request failed".to_string()
                } else {
                    status_text
                },
                details,
            },
            PitchsideError::UpstreamSoftFailure { body } => AppError::Upstream {
                status,
                error: "Upstream reported a failure".to_string(),
                details: Some(body),
            },
            PitchsideError::MissingToken => AppError::Internal {
                error: "Upstream access token is not configured".to_string(),
                details: None,
            },
            PitchsideError::InvalidConfig(message) => {
                AppError::internal("Invalid server configuration", message)
            },
            PitchsideError::Transport(reason) => AppError::internal("Upstream request failed", reason),
            PitchsideError::InvalidBody(reason) => {
                AppError::internal("Upstream returned an unusable body", reason)
            },
        }
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        match err {
            // Without a token there is nothing to retry; report it as such.
            CacheError::Fetch(PitchsideError::MissingToken) => PitchsideError::MissingToken.into(),
            CacheError::Fetch(cause) => {
                AppError::internal("Failed to fetch aggregate feed", cause.to_string())
            },
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let envelope = match self {
            AppError::NotFound(path) => ErrorEnvelope::new(format!("No route for {}", path)),
            AppError::BadRequest(message) => ErrorEnvelope::new(message),
            AppError::Upstream { error, details, .. } | AppError::Internal { error, details } => {
                ErrorEnvelope { error, details }
            },
        };

        (status, Json(envelope)).into_response()
    }
}
