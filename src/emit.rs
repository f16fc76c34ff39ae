//! CSV rows.
//!
//! Fields are never quoted. Commas and CR-LF pairs in free text are replaced
//! by a single space so that every record stays on one line with a fixed
//! number of columns.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{Comment, PullRequest};

pub fn escape_csv(value: &str) -> String {
    // GitHub uses \r\n for multiline text.
    value.replace(',', " ").replace("\r\n", " ")
}

/// `number,author,title,body`
pub fn pull_row(pull: &PullRequest) -> String {
    format!(
        "{},{},{},{}\n",
        pull.number,
        escape_csv(pull.author_login()),
        escape_csv(pull.title()),
        escape_csv(pull.body())
    )
}

/// `number,author,body`
pub fn comment_row(number: u64, comment: &Comment) -> String {
    format!(
        "{},{},{}\n",
        number,
        escape_csv(comment.author_login()),
        escape_csv(comment.body())
    )
}

/// `author,created_at,updated_at,body` for the repository-wide listing.
pub fn repo_comment_row(comment: &Comment) -> String {
    format!(
        "{},{},{},{}\n",
        escape_csv(comment.author_login()),
        timestamp(comment.created_at.as_ref()),
        timestamp(comment.updated_at.as_ref()),
        escape_csv(comment.body())
    )
}

fn timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::TimeZone;

    fn user(login: &str) -> Option<User> {
        Some(User {
            login: login.to_string(),
        })
    }

    #[test]
    fn clean_text_is_unchanged() {
        assert_eq!(escape_csv("plain text\nwith a newline"), "plain text\nwith a newline");
        assert_eq!(escape_csv(""), "");
    }

    #[test]
    fn replaces_commas_and_crlf() {
        assert_eq!(escape_csv("hello, world\r\nagain"), "hello  world again");
    }

    #[test]
    fn formats_pull_row() {
        let pull = PullRequest {
            number: 7,
            author: user("ana"),
            title: Some("Fix".to_string()),
            body: Some("a,b".to_string()),
        };
        assert_eq!(pull_row(&pull), "7,ana,Fix,a b\n");
    }

    #[test]
    fn formats_pull_row_without_body() {
        let pull = PullRequest {
            number: 3,
            author: None,
            title: Some("Bump, deps".to_string()),
            body: None,
        };
        assert_eq!(pull_row(&pull), "3,,Bump  deps,\n");
    }

    #[test]
    fn formats_pull_row_without_title() {
        let pull = PullRequest {
            number: 4,
            author: user("cy"),
            title: None,
            body: Some("text".to_string()),
        };
        assert_eq!(pull_row(&pull), "4,cy,,text\n");
    }

    #[test]
    fn formats_comment_rows() {
        let comment = Comment {
            author: user("bo"),
            body: Some("ok\r\nthanks".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            updated_at: None,
        };
        assert_eq!(comment_row(7, &comment), "7,bo,ok thanks\n");
        assert_eq!(
            repo_comment_row(&comment),
            "bo,2024-01-02T03:04:05Z,,ok thanks\n"
        );
    }
}
