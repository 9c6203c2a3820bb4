use axum::http::header;
use axum::response::IntoResponse;

/// Liveness probe. Does not touch the cache or the upstream.
pub async fn health_check() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}

/// Fallback for unknown routes.
pub async fn not_found(uri: axum::http::Uri) -> crate::error::AppError {
    crate::error::AppError::NotFound(uri.path().to_string())
}
