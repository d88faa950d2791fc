use crate::domain::errors::GitHubError;
use reqwest::Url;

/// `{base}/users/{user}/repos`
pub fn user_repositories(base_url: &str, user: &str) -> Result<String, GitHubError> {
    join(base_url, &["users", user, "repos"])
}

/// `{base}/repos/{user}/{repo}/commits`
pub fn repository_commits(base_url: &str, user: &str, repo: &str) -> Result<String, GitHubError> {
    join(base_url, &["repos", user, repo, "commits"])
}

// Segments are percent-encoded, so a name can never escape its path position.
fn join(base_url: &str, segments: &[&str]) -> Result<String, GitHubError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| GitHubError::invalid_argument(format!("invalid API base URL '{base_url}': {e}")))?;
    url.path_segments_mut()
        .map_err(|()| GitHubError::invalid_argument(format!("API base URL '{base_url}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}
