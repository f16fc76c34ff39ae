use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::env;
use std::mem;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{info, warn};

use crate::args::Args;
use crate::emit::{comment_row, pull_row, repo_comment_row};
use crate::error::{CrawlError, Result};
use crate::fetcher::{Credentials, Fetcher};
use crate::link::{parse_link_header, NEXT};
use crate::models::{decode_page, Comment, PullRequest};

/// URL templates of the listings, rooted at the API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
    repo: String,
}

impl Endpoints {
    pub fn new(base: &str, repo: &str) -> Result<Self> {
        match repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Endpoints {
                    base: base.trim_end_matches('/').to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(CrawlError::InvalidRepo(repo.to_string())),
        }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn pulls(&self) -> String {
        format!("{}/repos/{}/pulls?state=all", self.base, self.repo)
    }

    pub fn pull_comments(&self, number: u64) -> String {
        format!("{}/repos/{}/pulls/{}/comments", self.base, self.repo, number)
    }

    pub fn repo_comments(&self) -> String {
        format!("{}/repos/{}/pulls/comments", self.base, self.repo)
    }
}

enum Cursor {
    Fetching(String),
    Done,
}

/// Walks one paginated listing by following `rel="next"` links.
///
/// Each call to [`Paginator::next_page`] fetches the current URL, decodes its
/// body and advances to the page's `next` link. A body that does not decode
/// contributes no records, but its `Link` header is still followed, so one bad
/// page neither aborts the crawl nor gets fetched again.
pub struct Paginator<'a> {
    fetcher: &'a Fetcher,
    cursor: Cursor,
    pages: usize,
    skipped: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(fetcher: &'a Fetcher, url: String) -> Self {
        Paginator {
            fetcher,
            cursor: Cursor::Fetching(url),
            pages: 0,
            skipped: 0,
        }
    }

    /// Records of the next page, or `None` once the listing is exhausted.
    pub async fn next_page<T: DeserializeOwned>(&mut self) -> Result<Option<Vec<T>>> {
        let url = match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Fetching(url) => url,
            Cursor::Done => return Ok(None),
        };

        let page = self.fetcher.fetch(&url).await?;
        self.pages += 1;

        let records = match decode_page::<T>(&page.body) {
            Ok(records) => records,
            Err(e) => {
                warn!("Skipping page {} that failed to decode: {}", url, e);
                self.skipped += 1;
                Vec::new()
            }
        };

        if let Some(next) = parse_link_header(&page.headers).remove(NEXT) {
            info!("{}", next);
            self.cursor = Cursor::Fetching(next);
        }

        Ok(Some(records))
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Pages whose body failed to decode.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Counts for a finished crawl.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pulls: usize,
    pub comments: usize,
    pub pages: usize,
    pub skipped_pages: usize,
}

impl CrawlSummary {
    fn record(&mut self, listing: &Paginator<'_>) {
        self.pages += listing.pages();
        self.skipped_pages += listing.skipped();
    }
}

/// Crawls the pull requests of one repository.
///
/// Traversal is sequential and depth first: all review comments of a pull
/// request are written before the next pull request is looked at.
pub struct PullCrawler {
    fetcher: Fetcher,
    endpoints: Endpoints,
    progress: ProgressBar,
}

impl PullCrawler {
    /// Build a crawler from the command line. Missing credentials fall back
    /// to `GITHUB_USER` and `GITHUB_PASSWD`.
    pub fn new(args: &Args) -> Result<Self> {
        let endpoints = Endpoints::new(&args.api_url, &args.repo)?;

        let user = match &args.user {
            Some(user) => user.clone(),
            None => env::var("GITHUB_USER").unwrap_or_default(),
        };
        let passwd = match &args.passwd {
            Some(passwd) => passwd.clone(),
            None => env::var("GITHUB_PASSWD").unwrap_or_default(),
        };
        let credentials = Credentials::new(&user, &passwd);
        if credentials.is_none() {
            info!("No credentials given, sending unauthenticated requests");
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {wide_msg}")
        {
            progress.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }

        Ok(PullCrawler {
            fetcher: Fetcher::new(credentials)?,
            endpoints,
            progress,
        })
    }

    /// Write every pull request into `pulls` and every review comment, keyed
    /// by its pull request number, into `comments`.
    pub async fn run<P, C>(&self, pulls: &mut P, comments: &mut C) -> Result<CrawlSummary>
    where
        P: AsyncWrite + Unpin,
        C: AsyncWrite + Unpin,
    {
        let mut summary = CrawlSummary::default();

        // Rows written before a fatal error stay in the sinks.
        let result = self.crawl_pulls(pulls, comments, &mut summary).await;
        let flushed = flush_both(pulls, comments).await;
        result?;
        flushed?;

        self.progress.finish_with_message(format!(
            "Finished '{}': {} pull requests, {} comments",
            self.endpoints.repo(),
            summary.pulls,
            summary.comments
        ));
        Ok(summary)
    }

    async fn crawl_pulls<P, C>(
        &self,
        pulls: &mut P,
        comments: &mut C,
        summary: &mut CrawlSummary,
    ) -> Result<()>
    where
        P: AsyncWrite + Unpin,
        C: AsyncWrite + Unpin,
    {
        let url = self.endpoints.pulls();
        info!("Crawling {}", url);
        let mut listing = Paginator::new(&self.fetcher, url);

        while let Some(page) = listing.next_page::<PullRequest>().await? {
            self.progress.set_message(format!(
                "{} - pull request page {}",
                self.endpoints.repo(),
                listing.pages()
            ));
            self.progress.tick();

            for pull in page {
                pulls.write_all(pull_row(&pull).as_bytes()).await?;
                summary.pulls += 1;

                self.crawl_comments(pull.number, comments, summary).await?;
            }
        }
        summary.record(&listing);
        Ok(())
    }

    async fn crawl_comments<C>(
        &self,
        number: u64,
        comments: &mut C,
        summary: &mut CrawlSummary,
    ) -> Result<()>
    where
        C: AsyncWrite + Unpin,
    {
        let url = self.endpoints.pull_comments(number);
        info!("    comment {}", url);
        self.progress
            .set_message(format!("{} - comments of #{}", self.endpoints.repo(), number));

        let mut listing = Paginator::new(&self.fetcher, url);
        while let Some(page) = listing.next_page::<Comment>().await? {
            self.progress.tick();

            for comment in page {
                comments
                    .write_all(comment_row(number, &comment).as_bytes())
                    .await?;
                summary.comments += 1;
            }
        }
        summary.record(&listing);
        Ok(())
    }

    /// Dump the repository-wide review comment listing into `comments`.
    ///
    /// Rows carry no pull request number and cannot be joined with the pull
    /// request CSV.
    pub async fn run_repo_comments<C>(&self, comments: &mut C) -> Result<CrawlSummary>
    where
        C: AsyncWrite + Unpin,
    {
        let mut summary = CrawlSummary::default();

        let result = self.crawl_repo_comments(comments, &mut summary).await;
        let flushed = comments.flush().await;
        result?;
        flushed?;

        self.progress.finish_with_message(format!(
            "Finished '{}': {} comments",
            self.endpoints.repo(),
            summary.comments
        ));
        Ok(summary)
    }

    async fn crawl_repo_comments<C>(&self, comments: &mut C, summary: &mut CrawlSummary) -> Result<()>
    where
        C: AsyncWrite + Unpin,
    {
        let url = self.endpoints.repo_comments();
        info!("Crawling {}", url);
        let mut listing = Paginator::new(&self.fetcher, url);

        while let Some(page) = listing.next_page::<Comment>().await? {
            self.progress.set_message(format!(
                "{} - comment page {}",
                self.endpoints.repo(),
                listing.pages()
            ));
            self.progress.tick();

            for comment in page {
                comments
                    .write_all(repo_comment_row(&comment).as_bytes())
                    .await?;
                summary.comments += 1;
            }
        }
        summary.record(&listing);
        Ok(())
    }
}

async fn flush_both<P, C>(pulls: &mut P, comments: &mut C) -> Result<()>
where
    P: AsyncWrite + Unpin,
    C: AsyncWrite + Unpin,
{
    let pulls_flushed = pulls.flush().await;
    comments.flush().await?;
    Ok(pulls_flushed?)
}

/// Create (or truncate) an output CSV file.
pub async fn create_sink(path: &str) -> Result<BufWriter<File>> {
    let file = File::create(path).await.map_err(|source| CrawlError::Sink {
        path: path.to_string(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_listing_urls() {
        let endpoints = Endpoints::new("https://api.github.com/", "acme/widgets").unwrap();
        assert_eq!(
            endpoints.pulls(),
            "https://api.github.com/repos/acme/widgets/pulls?state=all"
        );
        assert_eq!(
            endpoints.pull_comments(7),
            "https://api.github.com/repos/acme/widgets/pulls/7/comments"
        );
        assert_eq!(
            endpoints.repo_comments(),
            "https://api.github.com/repos/acme/widgets/pulls/comments"
        );
    }

    #[test]
    fn rejects_malformed_repos() {
        for repo in ["widgets", "/widgets", "acme/", "acme/widgets/extra", ""] {
            assert!(matches!(
                Endpoints::new("https://api.github.com", repo),
                Err(CrawlError::InvalidRepo(_))
            ));
        }
    }
}
