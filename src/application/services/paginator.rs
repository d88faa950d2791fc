use crate::config::ApiConfig;
use crate::domain::errors::GitHubError;
use crate::domain::external_apis::http::{HttpResponse, HttpTransport};
use async_stream::try_stream;
use futures_util::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Status GitHub uses for listings over an empty resource, e.g. the commits
/// of a repository that has none. Treated as the end of the listing.
pub const EMPTY_RESOURCE_STATUS: u16 = 409;

pub const NOT_FOUND_STATUS: u16 = 404;

enum PageState {
    Fetching { url: String, first: bool },
    Done,
}

enum PageOutcome<T> {
    Records { records: Vec<T>, next: Option<String> },
    Empty,
}

/// Walks a list endpoint page by page, following the `next` link relation
/// until the API stops advertising one.
pub struct Paginator<H> {
    transport: Arc<H>,
    per_page: u32,
}

impl<H> Clone for Paginator<H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            per_page: self.per_page,
        }
    }
}

impl<H: HttpTransport + Send + Sync + 'static> Paginator<H> {
    pub fn new(transport: Arc<H>, config: &ApiConfig) -> Self {
        Self {
            transport,
            per_page: config.per_page,
        }
    }

    /// Every record of the listing, in page order.
    pub async fn fetch_all<T>(&self, endpoint: &str) -> Result<Vec<T>, GitHubError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.pages(endpoint.to_string()).try_concat().await
    }

    /// The records of each page as it arrives. The stream ends after the last
    /// page, or immediately on the empty-resource status.
    ///
    /// Only the first request carries `per_page`; `next` links already embed
    /// the paging parameters and are followed verbatim.
    pub fn pages<T>(&self, endpoint: String) -> impl Stream<Item = Result<Vec<T>, GitHubError>> + Send + use<H, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let transport = self.transport.clone();
        let per_page = self.per_page;

        try_stream! {
            let mut state = PageState::Fetching { url: endpoint, first: true };
            let mut page_number = 0usize;

            while let PageState::Fetching { url, first } = state {
                page_number += 1;
                let query = if first {
                    vec![("per_page", per_page.to_string())]
                } else {
                    Vec::new()
                };

                let response = transport.get(&url, &query).await?;
                match read_page::<T>(&url, response)? {
                    PageOutcome::Empty => {
                        tracing::debug!("{} reported an empty resource on page {}", url, page_number);
                        state = PageState::Done;
                    }
                    PageOutcome::Records { records, next } => {
                        tracing::debug!("Fetched page {} of {} ({} records)", page_number, url, records.len());
                        state = match next {
                            Some(next) => PageState::Fetching { url: next, first: false },
                            None => PageState::Done,
                        };
                        yield records;
                    }
                }
            }
        }
    }
}

fn read_page<T: DeserializeOwned>(endpoint: &str, response: HttpResponse) -> Result<PageOutcome<T>, GitHubError> {
    match response.status {
        EMPTY_RESOURCE_STATUS => return Ok(PageOutcome::Empty),
        NOT_FOUND_STATUS => {
            return Err(GitHubError::NotFound {
                endpoint: endpoint.to_string(),
            });
        }
        _ if !response.is_success() => return Err(GitHubError::status(endpoint, response.status)),
        _ => {}
    }

    let records = parse_records(endpoint, &response.body)?;
    let next = response.link("next").map(str::to_string);
    Ok(PageOutcome::Records { records, next })
}

fn parse_records<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<Vec<T>, GitHubError> {
    let malformed = |reason: String| GitHubError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(malformed(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| serde_json::from_value(item).map_err(|e| malformed(format!("item {index}: {e}"))))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use futures_util::StreamExt;
    use serde_json::json;

    const BASE: &str = "https://api.test/users/mockuser/repos";

    fn paginator(transport: ScriptedTransport) -> (Paginator<ScriptedTransport>, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        (Paginator::new(transport.clone(), &ApiConfig::default()), transport)
    }

    #[tokio::test]
    async fn test_single_page() -> Result<(), GitHubError> {
        let (paginator, _) = paginator(ScriptedTransport::new().page(BASE, json!([1, 2, 3]), None));

        let records: Vec<u32> = paginator.fetch_all(BASE).await?;
        assert_eq!(records, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_pages_concatenate_in_order() -> Result<(), GitHubError> {
        let page2 = format!("{BASE}?per_page=100&page=2");
        let page3 = format!("{BASE}?per_page=100&page=3");
        let (paginator, transport) = paginator(
            ScriptedTransport::new()
                .page(BASE, json!(["a", "b"]), Some(&page2))
                .page(&page2, json!(["c"]), Some(&page3))
                .page(&page3, json!(["d", "e"]), None),
        );

        let records: Vec<String> = paginator.fetch_all(BASE).await?;
        assert_eq!(records, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(transport.request_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_only_first_request_carries_page_size() -> Result<(), GitHubError> {
        let page2 = format!("{BASE}?per_page=100&page=2");
        let (paginator, transport) = paginator(
            ScriptedTransport::new()
                .page(BASE, json!([1]), Some(&page2))
                .page(&page2, json!([2]), None),
        );

        let _: Vec<u32> = paginator.fetch_all(BASE).await?;

        let requests = transport.requests();
        assert_eq!(requests[0].url, BASE);
        assert_eq!(requests[0].query, vec![("per_page".to_string(), "100".to_string())]);
        assert_eq!(requests[1].url, page2);
        assert!(requests[1].query.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_resource_status_yields_no_records() -> Result<(), GitHubError> {
        let (paginator, _) = paginator(ScriptedTransport::new().status(BASE, 409));

        let records: Vec<Value> = paginator.fetch_all(BASE).await?;
        assert!(records.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_resource_status_keeps_earlier_pages() -> Result<(), GitHubError> {
        let page2 = format!("{BASE}?page=2");
        let (paginator, _) = paginator(
            ScriptedTransport::new()
                .page(BASE, json!([1, 2]), Some(&page2))
                .status(&page2, 409),
        );

        let records: Vec<u32> = paginator.fetch_all(BASE).await?;
        assert_eq!(records, vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_on_any_page() {
        let page2 = format!("{BASE}?page=2");
        let (paginator, _) = paginator(ScriptedTransport::new().page(BASE, json!([1]), Some(&page2)));

        let result: Result<Vec<u32>, _> = paginator.fetch_all(BASE).await;
        match result {
            Err(GitHubError::NotFound { endpoint }) => assert_eq!(endpoint, page2),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_error_status_is_transport_error() {
        for status in [400, 403, 500, 503] {
            let (paginator, _) = paginator(ScriptedTransport::new().status(BASE, status));

            let result: Result<Vec<u32>, _> = paginator.fetch_all(BASE).await;
            assert!(
                matches!(result, Err(GitHubError::Transport { status: Some(s), .. }) if s == status),
                "status {status} gave {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_object_body_is_malformed() {
        let (paginator, _) = paginator(ScriptedTransport::new().page(BASE, json!({"message": "hi"}), None));

        let result: Result<Vec<Value>, _> = paginator.fetch_all(BASE).await;
        match result {
            Err(GitHubError::MalformedResponse { endpoint, reason }) => {
                assert_eq!(endpoint, BASE);
                assert!(reason.contains("an object"), "{reason}");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mismatched_item_is_malformed() {
        let (paginator, _) = paginator(ScriptedTransport::new().page(BASE, json!([1, "two"]), None));

        let result: Result<Vec<u32>, _> = paginator.fetch_all(BASE).await;
        assert!(matches!(result, Err(GitHubError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_pages_stream_yields_each_page() -> Result<(), GitHubError> {
        let page2 = format!("{BASE}?page=2");
        let (paginator, _) = paginator(
            ScriptedTransport::new()
                .page(BASE, json!([1, 2]), Some(&page2))
                .page(&page2, json!([]), None),
        );

        let pages: Vec<Result<Vec<u32>, GitHubError>> = paginator.pages(BASE.to_string()).collect().await;
        let pages = pages.into_iter().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(pages, vec![vec![1, 2], vec![]]);
        Ok(())
    }
}
