use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    /// A required identifier was empty. Raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resource not found: {endpoint}")]
    NotFound { endpoint: String },

    /// The repository listing for a user answered 404.
    #[error("user '{user}' does not exist or has no accessible repositories")]
    UserNotFound { user: String },

    /// The API answered 2xx with something other than a JSON array.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("{}", transport_message(.endpoint, .status, .source))]
    Transport {
        endpoint: String,
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl GitHubError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            status: Some(status),
            source: None,
        }
    }

    pub fn request(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            status: source.status().map(|s| s.as_u16()),
            source: Some(source),
        }
    }
}

fn transport_message(
    endpoint: &str,
    status: &Option<u16>,
    source: &Option<reqwest::Error>,
) -> String {
    match (status, source) {
        (Some(status), _) => format!("request to {endpoint} failed with HTTP {status}"),
        (None, Some(e)) if e.is_timeout() => format!("request to {endpoint} timed out"),
        (None, _) => format!("request to {endpoint} failed"),
    }
}
