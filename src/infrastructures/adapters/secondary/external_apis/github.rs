use crate::config::ApiConfig;
use crate::domain::errors::GitHubError;
use crate::domain::external_apis::http::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use reqwest::{Client, Url};
use reqwest::header::{ACCEPT, LINK};
use std::collections::HashMap;

const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

pub struct GitHubApiAdapter {
    client: Client,
}

impl GitHubApiAdapter {
    /// Builds a client that gives up on any single request after
    /// `config.timeout`.
    pub fn new(config: &ApiConfig) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GitHubError::request(config.base_url.clone(), e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for GitHubApiAdapter {
    #[tracing::instrument(name = "GitHubApiAdapter::get", skip(self, query))]
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, GitHubError> {
        // Only `next` links from upstream can be unparseable here.
        let mut target = Url::parse(url).map_err(|e| GitHubError::MalformedResponse {
            endpoint: url.to_string(),
            reason: format!("invalid URL: {e}"),
        })?;
        // Follow-up `next` links carry no extra query and are sent untouched.
        if !query.is_empty() {
            target.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let response = self
            .client
            .get(target)
            .header(ACCEPT, GITHUB_V3_JSON)
            .send()
            .await
            .map_err(|e| GitHubError::request(url, e))?;

        let status = response.status().as_u16();
        let links = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(parse_link_header)
            .collect();

        let body = response.text().await.map_err(|e| GitHubError::request(url, e))?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body, links })
    }
}

/// Parses a `Link` header into `rel` -> URL pairs.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/1/repos?per_page=100&page=2>; rel="next", <...&page=5>; rel="last"`
///
/// Targets are taken from between `<` and `>` before anything is split, so a
/// comma inside a URL never ends a link early.
pub fn parse_link_header(link_header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();
    let mut rest = link_header;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let url = &after[..end];
        let params = &after[end + 1..];

        // Parameters run up to the next comma outside a quoted value.
        let mut in_quotes = false;
        let mut params_end = params.len();
        for (index, c) in params.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    params_end = index;
                    break;
                }
                _ => {}
            }
        }

        for param in params[..params_end].split(';') {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("rel") {
                // A single link may carry several space-separated relation types.
                for rel in value.trim().trim_matches('"').split_whitespace() {
                    links.insert(rel.to_ascii_lowercase(), url.to_string());
                }
            }
        }

        rest = &params[params_end..];
    }

    links
}
