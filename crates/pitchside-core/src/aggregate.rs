//! The upstream aggregate document and the feeds projected from it.
//!
//! One upstream resource bundles live matches, upcoming matches, the series
//! list and news. A validated copy is an [`AggregateSnapshot`]; each
//! [`Feed`] is a named field inside its container object.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PitchsideError, Result};
use crate::request::{UpstreamMethod, UpstreamRequest};

/// A logical sub-resource of the aggregate document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Live,
    Upcoming,
    Series,
    News,
}

impl Feed {
    /// All feeds, in display order.
    pub const ALL: [Feed; 4] = [Feed::Live, Feed::Upcoming, Feed::Series, Feed::News];

    /// Short name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::Live => "live",
            Feed::Upcoming => "upcoming",
            Feed::Series => "series",
            Feed::News => "news",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field names of each feed inside the aggregate container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedFields {
    pub live: String,
    pub upcoming: String,
    pub series: String,
    pub news: String,
}

impl Default for FeedFields {
    fn default() -> Self {
        Self {
            live: "live_matches".to_string(),
            upcoming: "upcoming_matches".to_string(),
            series: "series_list".to_string(),
            news: "news".to_string(),
        }
    }
}

impl FeedFields {
    /// Field name for the given feed.
    pub fn field(&self, feed: Feed) -> &str {
        match feed {
            Feed::Live => &self.live,
            Feed::Upcoming => &self.upcoming,
            Feed::Series => &self.series,
            Feed::News => &self.news,
        }
    }
}

/// Where the aggregate document lives upstream and how it is shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Upstream path of the aggregate resource.
    pub path: String,
    /// Method used to fetch it.
    pub method: UpstreamMethod,
    /// Object field holding the feeds; `None` means the document root.
    pub container: Option<String>,
    /// Feed field names.
    pub fields: FeedFields,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            path: "/home".to_string(),
            method: UpstreamMethod::Get,
            container: Some("data".to_string()),
            fields: FeedFields::default(),
        }
    }
}

impl AggregateConfig {
    /// The outbound request that fetches the aggregate document.
    pub fn request(&self) -> UpstreamRequest {
        match self.method {
            UpstreamMethod::Get => UpstreamRequest::get(&self.path),
            UpstreamMethod::PostForm => UpstreamRequest::post_form(&self.path),
        }
    }

    /// Validates a fetched document and wraps it as a snapshot.
    pub fn snapshot(&self, document: Value) -> Result<AggregateSnapshot> {
        AggregateSnapshot::from_document(document, self.container.as_deref())
    }
}

/// A validated, read-only copy of the aggregate document.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSnapshot {
    feeds: Map<String, Value>,
}

impl AggregateSnapshot {
    /// Validates the minimal shape: the document (or its `container` field)
    /// must be a JSON object.
    ///
    /// ```
    /// use pitchside_core::AggregateSnapshot;
    /// use serde_json::json;
    ///
    /// let snapshot = AggregateSnapshot::from_document(
    ///     json!({"data": {"news": [{"id": 1}]}}),
    ///     Some("data"),
    /// ).unwrap();
    /// assert_eq!(snapshot.project("news"), json!([{"id": 1}]));
    /// assert_eq!(snapshot.project("live_matches"), json!([]));
    ///
    /// assert!(AggregateSnapshot::from_document(json!({"status": true}), Some("data")).is_err());
    /// ```
    pub fn from_document(document: Value, container: Option<&str>) -> Result<Self> {
        let feeds = match container {
            Some(field) => match document {
                Value::Object(mut root) => root.remove(field),
                _ => None,
            },
            None => Some(document),
        };

        match feeds {
            Some(Value::Object(feeds)) => Ok(Self { feeds }),
            _ => Err(PitchsideError::invalid_body(match container {
                Some(field) => format!("aggregate document has no '{}' object", field),
                None => "aggregate document is not a JSON object".to_string(),
            })),
        }
    }

    /// Copies one named field out of the snapshot.
    ///
    /// Absent and `null` fields project to an empty array.
    pub fn project(&self, field: &str) -> Value {
        match self.feeds.get(field) {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(value) => value.clone(),
        }
    }

    /// Projects the given feed using `fields` for the name mapping.
    pub fn feed(&self, feed: Feed, fields: &FeedFields) -> Value {
        self.project(fields.field(feed))
    }

    /// Field names present in the snapshot.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.feeds.keys().map(String::as_str)
    }
}
