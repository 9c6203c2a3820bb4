#![allow(dead_code)]
use pitchside_core::{EndpointSpec, EndpointTable, Params};

/// Builds inbound params from string pairs.
pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parses an endpoint table written as JSON, as it would appear in settings.
/// Panics if the JSON is invalid (intended for tests).
pub fn table_from_json(json: &str) -> EndpointTable {
    let specs: Vec<EndpointSpec> =
        serde_json::from_str(json).expect("Failed to parse endpoint specs");
    EndpointTable::compile(specs).expect("Failed to compile endpoint table")
}
