//! Upstream falso que responde segun un guion y registra las llamadas.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use pitchside_core::{PitchsideError, Result, UpstreamRequest, UpstreamResponse};
use pitchside_upstream::Upstream;
use serde_json::Value;

/// One scripted upstream answer.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A response with the given status and JSON body.
    Json(u16, Value),
    /// A transport failure.
    Fail(&'static str),
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Json(200, body)
    }

    fn into_result(self) -> Result<UpstreamResponse> {
        match self {
            Reply::Json(status, body) => {
                let text = axum::http::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("")
                    .to_string();
                Ok(UpstreamResponse::new(status, text, serde_json::to_vec(&body).unwrap()))
            },
            Reply::Fail(reason) => Err(PitchsideError::transport(reason)),
        }
    }
}

/// Answers per upstream path; the last reply for a path repeats forever.
/// Paths without a script answer 404.
#[derive(Default)]
pub struct FakeUpstream {
    script: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for a path.
    pub fn on(self, path: &str, reply: Reply) -> Self {
        self.push(path, reply);
        self
    }

    /// Queues a reply after construction.
    pub fn push(&self, path: &str, reply: Reply) {
        self.script
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().clone()
    }

    /// Number of requests received for a path.
    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|r| r.path == path).count()
    }

    fn next_reply(&self, path: &str) -> Reply {
        let mut script = self.script.lock();
        match script.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Reply::Json(404, serde_json::json!({ "message": "not found" })),
        }
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse> {
        self.calls.lock().push(request.clone());
        self.next_reply(&request.path).into_result()
    }

    fn name(&self) -> &str {
        "fake"
    }
}
