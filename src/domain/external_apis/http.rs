use crate::domain::errors::GitHubError;
use async_trait::async_trait;
use std::collections::HashMap;

/// A single response from a list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Link relations (`rel` -> absolute URL) advertised by the response.
    pub links: HashMap<String, String>,
}

impl HttpResponse {
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport {
    /// Issues one GET. `query` is appended to whatever query `url` already
    /// carries. Non-2xx statuses are returned as responses; only failures to
    /// obtain a response at all (connect errors, timeouts) are errors.
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, GitHubError>;
}
