use reqwest::header::HeaderMap;
use reqwest::Client;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{CrawlError, Result};

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub passwd: String,
}

impl Credentials {
    /// Requests are sent unauthenticated unless both parts are non-empty.
    pub fn new(user: &str, passwd: &str) -> Option<Self> {
        if user.is_empty() || passwd.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_string(),
            passwd: passwd.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("passwd", &"<redacted>")
            .finish()
    }
}

/// A fetched page: its headers (for pagination) and raw body (for decoding).
#[derive(Debug)]
pub struct Page {
    pub headers: HeaderMap,
    pub body: String,
}

pub struct Fetcher {
    client: Client,
    credentials: Option<Credentials>,
}

impl Fetcher {
    pub fn new(credentials: Option<Credentials>) -> Result<Self> {
        // GitHub rejects requests without a User-Agent.
        let client = Client::builder()
            .user_agent(concat!("github-pull-crawler/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Fetcher {
            client,
            credentials,
        })
    }

    /// GET one page. Any transport failure is returned as
    /// [`CrawlError::Transport`] and is not retried.
    pub async fn fetch(&self, url: &str) -> Result<Page> {
        debug!("Requesting URL: {}", url);

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user, Some(&credentials.passwd));
        }

        let transport = |source: reqwest::Error| CrawlError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;

        // Error bodies are left for the decoder to reject.
        if !response.status().is_success() {
            warn!("API returned {} for {}", response.status(), url);
        }

        let headers = response.headers().clone();
        let body = response.text().await.map_err(transport)?;

        Ok(Page { headers, body })
    }
}
