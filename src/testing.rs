//! In-memory transport for unit tests.

use crate::domain::errors::GitHubError;
use crate::domain::external_apis::http::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

/// Serves canned responses keyed by exact URL and records every request.
/// Unknown URLs answer 404. Tracks the peak number of overlapping requests.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, HttpResponse>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: Value, next: Option<&str>) -> Self {
        let mut links = HashMap::new();
        if let Some(next) = next {
            links.insert("next".to_string(), next.to_string());
        }
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status: 200,
                body: body.to_string(),
                links,
            },
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: String::new(),
                links: HashMap::new(),
            },
        );
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, GitHubError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                query: query.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect(),
            });
        }
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.responses.get(url).cloned().unwrap_or(HttpResponse {
            status: 404,
            ..HttpResponse::default()
        }))
    }
}
