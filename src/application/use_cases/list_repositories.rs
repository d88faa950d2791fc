use crate::application::services::endpoints;
use crate::application::services::paginator::Paginator;
use crate::config::ApiConfig;
use crate::domain::errors::GitHubError;
use crate::domain::external_apis::http::HttpTransport;
use crate::domain::models::repository::Repository;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait ListRepositoriesUseCase {
    /// Every repository of `user` in the order the API lists them. Forks are
    /// dropped after pagination unless `include_forks` is set.
    async fn list(&self, user: &str, include_forks: bool) -> Result<Vec<Repository>, GitHubError>;
}

pub struct RepositoryLister<H> {
    paginator: Paginator<H>,
    base_url: String,
}

impl<H: HttpTransport + Send + Sync + 'static> RepositoryLister<H> {
    pub fn new(transport: Arc<H>, config: &ApiConfig) -> Self {
        Self {
            paginator: Paginator::new(transport, config),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl<H: HttpTransport + Send + Sync + 'static> ListRepositoriesUseCase for RepositoryLister<H> {
    #[tracing::instrument(name = "RepositoryLister::list", skip(self))]
    async fn list(&self, user: &str, include_forks: bool) -> Result<Vec<Repository>, GitHubError> {
        if user.is_empty() {
            return Err(GitHubError::invalid_argument("username cannot be empty"));
        }

        let endpoint = endpoints::user_repositories(&self.base_url, user)?;
        // Elements are projected one by one so a single odd entry is skipped
        // rather than failing the whole listing.
        let records: Vec<Value> = match self.paginator.fetch_all(&endpoint).await {
            Err(GitHubError::NotFound { .. }) => {
                return Err(GitHubError::UserNotFound { user: user.to_string() });
            }
            other => other?,
        };

        let listed = records.len();
        let repositories: Vec<Repository> = records
            .into_iter()
            .filter_map(|record| {
                let repository = Repository::from_record(&record);
                if repository.is_none() {
                    tracing::warn!("Skipping a repository of {} without a usable name", user);
                }
                repository
            })
            .filter(|repository| include_forks || !repository.fork)
            .collect();

        tracing::info!("Listed {} of {} repositories for {}", repositories.len(), listed, user);
        Ok(repositories)
    }
}
