//! Pitchside Core - Domain types for the cricket-data proxy
//!
//! This crate holds everything that does not touch the network or an HTTP
//! framework: the error taxonomy, resolved upstream requests, path templates,
//! the declarative endpoint table and the aggregate snapshot with its feeds.

pub mod aggregate;
pub mod endpoint;
pub mod error;
pub mod outcome;
pub mod request;
pub mod template;

// Re-exports
pub use aggregate::{AggregateConfig, AggregateSnapshot, Feed, FeedFields};
pub use endpoint::{
    Endpoint, EndpointSpec, EndpointTable, EndpointTarget, ParamBinding, Params, Route,
    UpstreamRoute, default_endpoints,
};
pub use error::{PitchsideError, Result};
pub use outcome::{SoftFailureMarker, interpret};
pub use request::{UpstreamMethod, UpstreamRequest, UpstreamResponse};
pub use template::PathTemplate;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
