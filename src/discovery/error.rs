use thiserror::Error;

/// Failures that can occur while discovering a single company's pages.
///
/// None of these escape the engine: they are logged and folded into the
/// company's `DiscoveryResult`.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Homepage or search hit that is not a usable absolute URL
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection failure, timeout or unreadable body
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Search endpoint answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

impl DiscoveryError {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Request(e) if e.is_timeout() => "timeout",
            Self::Request(_) => "request",
            Self::Status { .. } => "status",
        }
    }
}
