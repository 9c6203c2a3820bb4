//! The one handler behind every entry of the endpoint table.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pitchside_core::{Endpoint, Feed, Params, Route, UpstreamRoute, interpret};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::state::AppState;

/// Handler for every configured route.
///
/// Aggregate routes are answered from the cache and ignore parameters;
/// upstream routes are resolved against the request parameters and forwarded
/// with the token injected. Undecodable parameters are a 400.
#[instrument(skip_all, fields(endpoint = %endpoint.name()))]
pub async fn dispatch(
    State(state): State<AppState>,
    Extension(endpoint): Extension<Arc<Endpoint>>,
    path: Result<Path<HashMap<String, String>>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, AppError> {
    match endpoint.target() {
        Route::Aggregate(feed) => serve_feed(&state, *feed).await,
        Route::Upstream(route) => {
            let path = match path {
                Ok(Path(path)) => Some(path),
                Err(PathRejection::MissingPathParams(_)) => None,
                Err(rejection) => return Err(rejection.into()),
            };
            let Query(query) = query?;

            let params = merge_params(path, query);
            forward(&state, route, &params).await
        },
    }
}

/// Responde con un feed del snapshot cacheado.
pub async fn serve_feed(state: &AppState, feed: Feed) -> Result<Response, AppError> {
    let items = state.cache().feed(feed).await?;
    Ok(Json(items).into_response())
}

/// Resolves one pass-through request and relays the upstream answer.
pub async fn forward(
    state: &AppState,
    route: &UpstreamRoute,
    params: &Params,
) -> Result<Response, AppError> {
    let request = route.resolve(params)?;
    debug!(
        template = %route.template(),
        path = %request.path,
        method = ?request.method,
        "forwarding to upstream"
    );

    let response = state.upstream().send(&request).await?;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    let body = interpret(response, state.soft_failure())?;

    Ok((status, Json(body)).into_response())
}

/// Path parameters win over query parameters of the same name.
fn merge_params(path: Option<HashMap<String, String>>, query: HashMap<String, String>) -> Params {
    let mut params = query;
    params.extend(path.unwrap_or_default());
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_params_override_query() {
        let path = HashMap::from([("match_id".to_string(), "42".to_string())]);
        let query = HashMap::from([
            ("match_id".to_string(), "7".to_string()),
            ("lang".to_string(), "en".to_string()),
        ]);

        let params = merge_params(Some(path), query);

        assert_eq!(params["match_id"], "42");
        assert_eq!(params["lang"], "en");
    }

    #[test]
    fn test_no_path_params() {
        let query = HashMap::from([("q".to_string(), "kohli".to_string())]);

        let params = merge_params(None, query);

        assert_eq!(params.len(), 1);
    }
}
