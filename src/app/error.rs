use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RssProxyError {
    #[error("Missing required parameter: url")]
    MissingUrl,

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Invalid filter pattern: {0}")]
    InvalidFilter(String),

    #[error("Domain {0} is not allowed")]
    BlockedDomain(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream {url} responded with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Response from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Content extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    /// One failure handed to every caller waiting on the same cache key.
    #[error(transparent)]
    Shared(Arc<RssProxyError>),
}

impl RssProxyError {
    /// Errors caused by the caller's input rather than by an upstream.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Shared(inner) => inner.is_client_error(),
            _ => matches!(
                self,
                Self::MissingUrl | Self::InvalidUrl(_) | Self::InvalidFilter(_)
            ),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        match self {
            Self::Shared(inner) => inner.is_forbidden(),
            _ => matches!(self, Self::BlockedDomain(_)),
        }
    }

    /// Failures reaching or decoding the upstream feed.
    pub fn is_upstream(&self) -> bool {
        match self {
            Self::Shared(inner) => inner.is_upstream(),
            _ => matches!(
                self,
                Self::Http(_)
                    | Self::UpstreamStatus { .. }
                    | Self::BodyTooLarge { .. }
                    | Self::FeedParse(_)
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, RssProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_domain_message_names_host() {
        let err = RssProxyError::BlockedDomain("10.0.0.1".into());
        assert_eq!(err.to_string(), "Domain 10.0.0.1 is not allowed");
        assert!(err.is_forbidden());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_classification() {
        assert!(RssProxyError::MissingUrl.is_client_error());
        assert!(RssProxyError::InvalidUrl("nope".into()).is_client_error());
        assert!(RssProxyError::FeedParse("bad xml".into()).is_upstream());
        assert!(RssProxyError::UpstreamStatus {
            url: "https://example.com".into(),
            status: 404
        }
        .is_upstream());
        assert!(!RssProxyError::Config("x".into()).is_upstream());
        assert!(RssProxyError::InvalidFilter("(".into()).is_client_error());
    }

    #[test]
    fn test_shared_error_keeps_classification() {
        let shared = RssProxyError::Shared(Arc::new(RssProxyError::FeedParse("bad".into())));
        assert!(shared.is_upstream());
        assert_eq!(shared.to_string(), "Feed parsing error: bad");

        let shared = RssProxyError::Shared(Arc::new(RssProxyError::BlockedDomain("x".into())));
        assert!(shared.is_forbidden());
    }
}
