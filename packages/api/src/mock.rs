//! Scripted in-memory backend for tests.
//!
//! Routes are keyed by method and path. Each route holds a queue of canned
//! outcomes; the last one repeats once the queue is down to it. Unknown routes
//! answer 404. Every request is recorded after the gateway has attached its
//! bearer token, so tests can assert on headers and bodies.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use reqwest::Method;

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Debug, Clone)]
enum Outcome {
    Reply(ApiResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct Inner {
    routes: HashMap<(Method, String), VecDeque<Outcome>>,
    requests: Vec<ApiRequest>,
}

/// Transport that answers from a script instead of the network.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for `method path`.
    pub fn on(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.push(method, path, Outcome::Reply(ApiResponse::new(status, body.to_string())))
    }

    /// Queue a reply with a raw (possibly non-JSON) body.
    pub fn on_raw(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Outcome::Reply(ApiResponse::new(status, body)))
    }

    /// Queue a transport failure (no response at all).
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Outcome::Fail(message.to_string()))
    }

    /// Drop everything scripted for `method path`.
    pub fn clear(&self, method: Method, path: &str) -> &Self {
        self.lock().routes.remove(&(method, path.to_string()));
        self
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Requests seen for one route.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.lock().requests.last().cloned()
    }

    fn push(&self, method: Method, path: &str, outcome: Outcome) -> &Self {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut inner = self.lock();
        let key = (request.method.clone(), request.path.clone());
        inner.requests.push(request);

        let outcome = match inner.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match outcome {
            Some(Outcome::Reply(response)) => Ok(response),
            Some(Outcome::Fail(message)) => Err(ApiError::Transport(message)),
            None => Ok(ApiResponse::new(404, r#"{"detail": "Not Found"}"#)),
        }
    }
}
