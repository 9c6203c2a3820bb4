//! Middleware que genera o propaga X-Request-Id.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest incoming request ID that is propagated as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Layer that adds request ID to requests and responses.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware that ensures every request has a unique ID.
///
/// Generated IDs are UUID v7, so they sort by creation time in logs.
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

/// Returns the caller's request ID when it is usable, or a new one.
fn request_id_for(request: &Request<Body>) -> HeaderValue {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::now_v7().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

impl<S> Service<Request<Body>> for RequestIdMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = request_id_for(&request);

        // Handlers and the logging layer read it from the request headers
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), request_id.clone());

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), request_id);

            Ok(response)
        })
    }
}
