mod common;

use common::{params, table_from_json};
use pitchside_core::{
    EndpointSpec, EndpointTable, Feed, PitchsideError, Route, SoftFailureMarker, UpstreamMethod,
    UpstreamResponse, default_endpoints, interpret,
};
use serde_json::json;

const CUSTOM_TABLE: &str = r#"[
    {
        "name": "live",
        "route": "/live",
        "target": { "source": "aggregate", "feed": "live" }
    },
    {
        "name": "points-table",
        "route": "/points-table",
        "target": {
            "source": "upstream",
            "path": "/series/{series_id}/points-table",
            "query": [{ "name": "series_id", "param": "id", "required": true }]
        }
    },
    {
        "name": "commentary",
        "route": "/matches/{match_id}/commentary",
        "target": {
            "source": "upstream",
            "path": "/commentary",
            "method": "post_form",
            "form": [{ "name": "matchId", "param": "match_id", "required": true }]
        }
    }
]"#;

#[test]
fn custom_table_deserializes() {
    let table = table_from_json(CUSTOM_TABLE);

    assert_eq!(table.len(), 3);
    assert_eq!(table.get("live").unwrap().route(), "/live");
    assert_eq!(
        table.get("live").unwrap().target(),
        &Route::Aggregate(Feed::Live)
    );
}

#[test]
fn points_table_can_take_id_from_query_and_path() {
    let table = table_from_json(CUSTOM_TABLE);
    let Route::Upstream(route) = table.get("points-table").unwrap().target() else {
        panic!("points-table should be a pass-through endpoint");
    };

    // The template placeholder reads `series_id`, the query binding reads `id`.
    let request = route
        .resolve(&params(&[("series_id", "12"), ("id", "12")]))
        .unwrap();
    assert_eq!(request.path, "/series/12/points-table");
    assert_eq!(request.query, vec![("series_id".to_string(), "12".to_string())]);

    let error = route.resolve(&params(&[("id", "12")])).unwrap_err();
    assert!(matches!(error, PitchsideError::MissingParameter(ref p) if p == "series_id"));
}

#[test]
fn form_post_endpoint_from_settings() {
    let table = table_from_json(CUSTOM_TABLE);
    let Route::Upstream(route) = table.get("commentary").unwrap().target() else {
        panic!("commentary should be a pass-through endpoint");
    };

    let request = route.resolve(&params(&[("match_id", "5501")])).unwrap();
    assert_eq!(request.method, UpstreamMethod::PostForm);
    assert_eq!(request.form, vec![("matchId".to_string(), "5501".to_string())]);
}

#[test]
fn malformed_template_is_a_configuration_error() {
    let specs: Vec<EndpointSpec> = serde_json::from_value(json!([{
        "name": "broken",
        "route": "/broken",
        "target": { "source": "upstream", "path": "/match/{id" }
    }]))
    .unwrap();

    let error = EndpointTable::compile(specs).unwrap_err();
    assert!(error.is_configuration_error());
}

#[test]
fn unknown_feed_fails_to_deserialize() {
    let result: Result<Vec<EndpointSpec>, _> = serde_json::from_value(json!([{
        "name": "scores",
        "route": "/scores",
        "target": { "source": "aggregate", "feed": "scores" }
    }]));

    assert!(result.is_err());
}

#[test]
fn default_table_round_trips_through_serde() {
    let specs = default_endpoints();
    let json = serde_json::to_string(&specs).unwrap();
    let parsed: Vec<EndpointSpec> = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, specs);
}

#[test]
fn missing_param_never_reaches_interpretation() {
    let table = EndpointTable::compile(default_endpoints()).unwrap();
    let Route::Upstream(route) = table.get("match-info").unwrap().target() else {
        panic!("match-info should be a pass-through endpoint");
    };

    let error = route.resolve(&params(&[])).unwrap_err();
    assert_eq!(error.status_code(), 400);
}

#[test]
fn soft_failure_body_is_kept_verbatim() {
    let body = json!({"status": false, "msg": "Something went wrong."});
    let response = UpstreamResponse::new(200, "OK", body.to_string());

    let error = interpret(response, &SoftFailureMarker::default()).unwrap_err();
    assert_eq!(error.status_code(), 502);
    match error {
        PitchsideError::UpstreamSoftFailure { body: passed } => assert_eq!(passed, body),
        other => panic!("unexpected error: {:?}", other),
    }
}
