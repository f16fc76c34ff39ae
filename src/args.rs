use clap::{Parser, ValueEnum};
use std::fmt;

/// Which listing the crawl walks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Every pull request, then every review comment of each pull request.
    /// Both CSV files share the `number` column.
    #[default]
    Pulls,
    /// The repository-wide review comment listing only. Rows carry
    /// timestamps instead of a pull request number.
    RepoComments,
}

/// Pull request crawler that writes pull requests and their review comments
/// as two CSV files joinable on the pull request number.
#[derive(Parser, Clone)]
#[clap(
    author,
    version,
    about,
    long_about = "Crawls every pull request and review comment of a GitHub repository, following Link header pagination, and writes them as two CSV files joinable by pull request number."
)]
pub struct Args {
    /// Repository to crawl, in `owner/name` form.
    pub repo: String,

    /// GitHub username. Falls back to the GITHUB_USER environment variable.
    #[clap(short, long)]
    pub user: Option<String>,

    /// GitHub password or token. Falls back to the GITHUB_PASSWD environment variable.
    #[clap(short, long)]
    pub passwd: Option<String>,

    /// Output CSV file for pull requests.
    #[clap(long, default_value = "pulls.csv")]
    pub pulls: String,

    /// Output CSV file for review comments.
    #[clap(long, default_value = "comments.csv")]
    pub comments: String,

    /// Crawl mode.
    #[clap(short, long, value_enum, default_value_t = Mode::Pulls)]
    pub mode: Mode,

    /// Base URL of the REST API.
    #[clap(long, value_name = "URL", default_value = "https://api.github.com")]
    pub api_url: String,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("repo", &self.repo)
            .field("user", &self.user)
            .field("passwd", &self.passwd.as_ref().map(|_| "<redacted>"))
            .field("pulls", &self.pulls)
            .field("comments", &self.comments)
            .field("mode", &self.mode)
            .field("api_url", &self.api_url)
            .finish()
    }
}
