use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The largest page size the GitHub REST API honours.
pub const MAX_PER_PAGE: u32 = 100;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_CONCURRENCY: usize = 4;

/// Static settings shared by the transport and the use cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub per_page: u32,
    pub timeout: Duration,
    /// Maximum number of commit listings in flight while building a report.
    pub concurrency: usize,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            per_page: MAX_PER_PAGE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Clamped to `1..=MAX_PER_PAGE`.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A concurrency of zero is treated as one (sequential).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.github.com");
        assert_eq!(config.per_page, 100);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.concurrency, 4);
        assert!(config.user_agent.starts_with("gh-commit-report/"));
    }

    #[test]
    fn test_builders_clamp_out_of_range_values() {
        let config = ApiConfig::default().with_per_page(500).with_concurrency(0);
        assert_eq!(config.per_page, 100);
        assert_eq!(config.concurrency, 1);

        let config = ApiConfig::default().with_per_page(0);
        assert_eq!(config.per_page, 1);
    }
}
