use crate::application::services::endpoints;
use crate::application::services::paginator::Paginator;
use crate::config::ApiConfig;
use crate::domain::errors::GitHubError;
use crate::domain::external_apis::http::HttpTransport;
use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;

#[async_trait]
pub trait CountCommitsUseCase {
    /// Number of commits reachable from the default branch of `user/repo`.
    /// An empty repository counts as zero.
    async fn count(&self, user: &str, repo: &str) -> Result<u64, GitHubError>;
}

pub struct CommitCounter<H> {
    paginator: Paginator<H>,
    base_url: String,
}

impl<H: HttpTransport + Send + Sync + 'static> CommitCounter<H> {
    pub fn new(transport: Arc<H>, config: &ApiConfig) -> Self {
        Self {
            paginator: Paginator::new(transport, config),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl<H: HttpTransport + Send + Sync + 'static> CountCommitsUseCase for CommitCounter<H> {
    #[tracing::instrument(name = "CommitCounter::count", skip(self))]
    async fn count(&self, user: &str, repo: &str) -> Result<u64, GitHubError> {
        if user.is_empty() || repo.is_empty() {
            return Err(GitHubError::invalid_argument("both user and repository are required"));
        }

        let endpoint = endpoints::repository_commits(&self.base_url, user, repo)?;
        // Commit contents are never read, only counted.
        let commits: Vec<IgnoredAny> = self.paginator.fetch_all(&endpoint).await?;

        tracing::debug!("{}/{} has {} commits", user, repo, commits.len());
        Ok(commits.len() as u64)
    }
}
