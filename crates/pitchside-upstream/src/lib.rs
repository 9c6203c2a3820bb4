//! # Pitchside Upstream
//!
//! The HTTP side of the Pitchside proxy: an [`Upstream`] trait for sending
//! resolved requests, and [`HttpUpstream`], which sends them with `reqwest`
//! after injecting the secret access token.
//!
//! ## Example
//!
//! ```ignore
//! use pitchside_core::UpstreamRequest;
//! use pitchside_upstream::{HttpUpstream, TokenPlacement, Upstream, UpstreamConfig};
//!
//! let config = UpstreamConfig::builder()
//!     .base_url("https://cricket.example.com/v1")
//!     .token(std::env::var("PITCHSIDE_UPSTREAM__TOKEN")?)
//!     .token_placement(TokenPlacement::PathSegment)
//!     .build()?;
//!
//! let upstream = HttpUpstream::new(config)?;
//! let response = upstream.send(&UpstreamRequest::get("/matches/recent")).await?;
//! ```

pub mod config;
pub mod http;
pub mod source;

// Re-exports
pub use config::{TokenPlacement, UpstreamConfig, UpstreamConfigBuilder, validate_base_url};
pub use http::HttpUpstream;
pub use source::Upstream;

// Re-export pitchside_core for consumers
pub use pitchside_core;
