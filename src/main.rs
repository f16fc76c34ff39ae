use clap::Parser;
use dotenv::dotenv;
use std::error::Error;
use tracing::{error, info};

use pull_crawler::{create_sink, Args, Mode, PullCrawler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize the tracing logger
    tracing_subscriber::fmt::init();

    dotenv().ok();

    let args = Args::parse();

    if let Err(e) = run(&args).await {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}

async fn run(args: &Args) -> pull_crawler::Result<()> {
    let crawler = PullCrawler::new(args)?;

    let summary = match args.mode {
        Mode::Pulls => {
            let mut pulls = create_sink(&args.pulls).await?;
            let mut comments = create_sink(&args.comments).await?;
            let summary = crawler.run(&mut pulls, &mut comments).await?;
            info!(
                "Saved pull requests to '{}' and comments to '{}'",
                args.pulls, args.comments
            );
            summary
        }
        Mode::RepoComments => {
            let mut comments = create_sink(&args.comments).await?;
            let summary = crawler.run_repo_comments(&mut comments).await?;
            info!("Saved comments to '{}'", args.comments);
            summary
        }
    };

    info!(
        "Crawled {} pull requests and {} comments over {} pages ({} skipped)",
        summary.pulls, summary.comments, summary.pages, summary.skipped_pages
    );
    Ok(())
}
