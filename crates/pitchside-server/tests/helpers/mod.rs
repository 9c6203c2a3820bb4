//! Test helpers para pitchside-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod upstream;

pub use client::{TestClient, TestResponse, app_client, client};
pub use upstream::{FakeUpstream, Reply};
