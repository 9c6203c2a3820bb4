//! HTTP handlers.

pub mod endpoint;
pub mod health;
pub mod metrics;
pub mod response;
