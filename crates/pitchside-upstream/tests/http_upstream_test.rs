//! HttpUpstream against an in-process fake cricket API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use pitchside_core::{PitchsideError, UpstreamRequest};
use pitchside_upstream::{HttpUpstream, TokenPlacement, Upstream, UpstreamConfig};
use serde_json::{Value, json};

const TOKEN: &str = "test-token";

async fn match_info(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!({ "match_id": id, "query": query }))
}

async fn home_with_token(Path(token): Path<String>) -> Json<Value> {
    Json(json!({ "data": { "news": [] }, "token": token }))
}

async fn points_table(
    Query(query): Query<HashMap<String, String>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!({ "form": form, "query": query }))
}

async fn unavailable() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "message": "maintenance" })),
    )
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

async fn spawn_fake_api() -> SocketAddr {
    let app = Router::new()
        .route("/v1/match/{id}/info", get(match_info))
        .route("/v1/home/{token}", get(home_with_token))
        .route("/v1/series/points-table", post(points_table))
        .route("/v1/unavailable", get(unavailable))
        .route("/v1/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn upstream(addr: SocketAddr, placement: TokenPlacement) -> HttpUpstream {
    let config = UpstreamConfig::builder()
        .base_url(format!("http://{}/v1", addr))
        .token(TOKEN)
        .token_placement(placement)
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    HttpUpstream::new(config).unwrap()
}

fn body(response: &pitchside_core::UpstreamResponse) -> Value {
    serde_json::from_slice(&response.body).unwrap()
}

#[tokio::test]
async fn get_injects_token_as_query_parameter() {
    let addr = spawn_fake_api().await;
    let upstream = upstream(addr, TokenPlacement::default());

    let response = upstream
        .send(&UpstreamRequest::get("/match/88/info").with_query("lang", "en"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let body = body(&response);
    assert_eq!(body["match_id"], "88");
    assert_eq!(body["query"]["apikey"], TOKEN);
    assert_eq!(body["query"]["lang"], "en");
}

#[tokio::test]
async fn get_injects_token_as_path_segment() {
    let addr = spawn_fake_api().await;
    let upstream = upstream(addr, TokenPlacement::PathSegment);

    let response = upstream.send(&UpstreamRequest::get("/home")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(body(&response)["token"], TOKEN);
}

#[tokio::test]
async fn post_form_sends_url_encoded_body() {
    let addr = spawn_fake_api().await;
    let upstream = upstream(addr, TokenPlacement::default());

    let request = UpstreamRequest::post_form("/series/points-table").with_form("series_id", "3718");
    let response = upstream.send(&request).await.unwrap();

    assert_eq!(response.status, 200);
    let body = body(&response);
    assert_eq!(body["form"]["series_id"], "3718");
    assert_eq!(body["query"]["apikey"], TOKEN);
}

#[tokio::test]
async fn error_status_is_a_response_not_an_error() {
    let addr = spawn_fake_api().await;
    let upstream = upstream(addr, TokenPlacement::default());

    let response = upstream
        .send(&UpstreamRequest::get("/unavailable"))
        .await
        .unwrap();

    assert_eq!(response.status, 503);
    assert_eq!(response.status_text, "Service Unavailable");
    assert_eq!(body(&response)["message"], "maintenance");
}

#[tokio::test]
async fn missing_token_fails_before_sending() {
    let addr = spawn_fake_api().await;
    let config = UpstreamConfig::builder()
        .base_url(format!("http://{}/v1", addr))
        .build()
        .unwrap();
    let upstream = HttpUpstream::new(config).unwrap();

    let error = upstream
        .send(&UpstreamRequest::get("/match/1/info"))
        .await
        .unwrap_err();

    assert!(matches!(error, PitchsideError::MissingToken));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let upstream = upstream(addr, TokenPlacement::default());
    let error = upstream
        .send(&UpstreamRequest::get("/match/1/info"))
        .await
        .unwrap_err();

    match &error {
        PitchsideError::Transport(reason) => assert!(
            reason.to_lowercase().contains("refused"),
            "cause missing from '{}'",
            reason
        ),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!error.to_string().contains(TOKEN), "token leaked: {}", error);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let addr = spawn_fake_api().await;
    let upstream = upstream(addr, TokenPlacement::default());

    let error = upstream
        .send(&UpstreamRequest::get("/slow"))
        .await
        .unwrap_err();

    match &error {
        PitchsideError::Transport(reason) => assert!(
            reason.contains("timed out"),
            "cause missing from '{}'",
            reason
        ),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!error.to_string().contains(TOKEN));
}
