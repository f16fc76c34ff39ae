use thiserror::Error;

/// Errors that end a crawl.
///
/// A page whose body cannot be decoded is not one of them: the crawler skips
/// that page and keeps following its pagination cursor.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("repository must be in owner/name form, got '{0}'")]
    InvalidRepo(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot create output file {path}: {source}")]
    Sink {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
