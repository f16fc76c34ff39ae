//! # GitHub Pull Crawler
//!
//! Crawls every pull request of a GitHub repository and every review comment
//! of each pull request, following `Link` header pagination, and writes them
//! as two CSV streams joinable on the pull request number.
//!
//! ## Main Components
//!
//! - [`PullCrawler`]: the crawl engine, walking the pull request listing and,
//!   for each pull request, its comment listing
//! - [`Paginator`]: follows `rel="next"` links through one listing
//! - [`Args`]: Command line argument structure for configuring the crawl
//!
//! ## Example
//!
//! ```no_run
//! use pull_crawler::{create_sink, Args, PullCrawler};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let args = Args::parse();
//!
//!     let mut pulls = create_sink(&args.pulls).await?;
//!     let mut comments = create_sink(&args.comments).await?;
//!
//!     let crawler = PullCrawler::new(&args)?;
//!     let summary = crawler.run(&mut pulls, &mut comments).await?;
//!     println!("{} pull requests", summary.pulls);
//!
//!     Ok(())
//! }
//! ```

mod args;
mod crawler;
pub mod emit;
mod error;
pub mod fetcher;
pub mod link;
pub mod models;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Mode};
pub use crate::crawler::{create_sink, CrawlSummary, Endpoints, Paginator, PullCrawler};
pub use crate::error::{CrawlError, Result};
