use crate::application::use_cases::count_commits::{CommitCounter, CountCommitsUseCase};
use crate::application::use_cases::list_repositories::{ListRepositoriesUseCase, RepositoryLister};
use crate::config::ApiConfig;
use crate::domain::errors::GitHubError;
use crate::domain::external_apis::http::HttpTransport;
use crate::domain::models::report::{Report, ReportEntry};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;

#[async_trait]
pub trait BuildCommitReportUseCase {
    async fn build(&self, user: &str, include_forks: bool) -> Result<Report, GitHubError>;
}

/// Lists a user's repositories once, then counts the commits of each.
///
/// At most `concurrency` commit listings run at a time. Results are consumed
/// in listing order, so when several repositories fail the error reported is
/// the one for the repository listed first, and no partial report is ever
/// returned.
pub struct BuildCommitReportInteractor<L, C> {
    lister: Arc<L>,
    counter: Arc<C>,
    concurrency: usize,
}

impl<L, C> BuildCommitReportInteractor<L, C> {
    pub fn new(lister: Arc<L>, counter: Arc<C>, concurrency: usize) -> Self {
        Self {
            lister,
            counter,
            concurrency: concurrency.max(1),
        }
    }
}

impl<H: HttpTransport + Send + Sync + 'static> BuildCommitReportInteractor<RepositoryLister<H>, CommitCounter<H>> {
    pub fn from_transport(transport: Arc<H>, config: &ApiConfig) -> Self {
        Self::new(
            Arc::new(RepositoryLister::new(transport.clone(), config)),
            Arc::new(CommitCounter::new(transport, config)),
            config.concurrency,
        )
    }
}

#[async_trait]
impl<L, C> BuildCommitReportUseCase for BuildCommitReportInteractor<L, C>
where
    L: ListRepositoriesUseCase + Send + Sync + 'static,
    C: CountCommitsUseCase + Send + Sync + 'static,
{
    #[tracing::instrument(name = "BuildCommitReportInteractor::build", skip(self))]
    async fn build(&self, user: &str, include_forks: bool) -> Result<Report, GitHubError> {
        let repositories = self.lister.list(user, include_forks).await?;
        tracing::info!("Counting commits for {} repositories", repositories.len());

        let repositories = repositories.into_iter().filter(|repository| !repository.name.is_empty());
        let counter = &self.counter;
        let entries: Vec<ReportEntry> = stream::iter(repositories)
            .map(|repository| async move {
                let commits = counter.count(user, &repository.name).await?;
                Ok::<_, GitHubError>(ReportEntry {
                    name: repository.name,
                    commits,
                    fork: repository.fork,
                })
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(Report::from_entries(entries))
    }
}
