//! Records decoded from the pull request and review comment listings.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Account that authored a pull request or comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// `null` for pull requests opened by deleted accounts.
    #[serde(rename = "user", default)]
    pub author: Option<User>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl PullRequest {
    pub fn author_login(&self) -> &str {
        self.author.as_ref().map_or("", |user| user.login.as_str())
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// A review comment. The parent pull request number is not part of the
/// record; the per pull request crawl supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    #[serde(rename = "user", default)]
    pub author: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn author_login(&self) -> &str {
        self.author.as_ref().map_or("", |user| user.login.as_str())
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// RFC 3339 timestamp, or `None` when absent or unparsable. A bad timestamp
/// must not cost the rest of the page.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|time| time.with_timezone(&Utc)))
}

/// Decode one page of a listing, which GitHub returns as a JSON array.
pub fn decode_page<T: DeserializeOwned>(body: &str) -> serde_json::Result<Vec<T>> {
    serde_json::from_str(body)
}

pub fn decode_pull_page(body: &str) -> serde_json::Result<Vec<PullRequest>> {
    decode_page(body)
}

pub fn decode_comment_page(body: &str) -> serde_json::Result<Vec<Comment>> {
    decode_page(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pull_page() {
        let body = r#"[
            {"number": 7, "user": {"login": "ana", "id": 1}, "title": "Fix", "body": "a,b", "state": "open"},
            {"number": 8, "user": null, "title": "Docs", "body": null}
        ]"#;

        let pulls = decode_pull_page(body).unwrap();
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].number, 7);
        assert_eq!(pulls[0].author_login(), "ana");
        assert_eq!(pulls[0].body(), "a,b");
        assert_eq!(pulls[1].author_login(), "");
        assert_eq!(pulls[1].body(), "");
    }

    #[test]
    fn decodes_comment_page_with_timestamps() {
        let body = r#"[{
            "user": {"login": "bo"},
            "body": "ok\r\nthanks",
            "created_at": "2011-04-14T16:00:49Z",
            "updated_at": "2011-04-15T08:30:00Z",
            "pull_request_url": "https://api.github.com/repos/acme/widgets/pulls/7"
        }]"#;

        let comments = decode_comment_page(body).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_login(), "bo");
        assert_eq!(comments[0].body(), "ok\r\nthanks");
        assert_eq!(
            comments[0].created_at.unwrap().to_rfc3339(),
            "2011-04-14T16:00:49+00:00"
        );
    }

    #[test]
    fn null_title_keeps_the_page() {
        let body = r#"[
            {"number": 1, "user": {"login": "ana"}, "title": "Fix", "body": "x"},
            {"number": 2, "user": {"login": "bo"}, "title": null, "body": "y"}
        ]"#;

        let pulls = decode_pull_page(body).unwrap();
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].title(), "Fix");
        assert_eq!(pulls[1].number, 2);
        assert_eq!(pulls[1].title(), "");
        assert_eq!(pulls[1].body(), "y");
    }

    #[test]
    fn malformed_timestamp_keeps_the_page() {
        let body = r#"[
            {"user": {"login": "ana"}, "body": "first", "created_at": "2024-01-02 03:04:05", "updated_at": 17},
            {"user": {"login": "bo"}, "body": "second", "created_at": "2024-01-02T03:04:05Z", "updated_at": null}
        ]"#;

        let comments = decode_comment_page(body).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author_login(), "ana");
        assert_eq!(comments[0].body(), "first");
        assert!(comments[0].created_at.is_none());
        assert!(comments[0].updated_at.is_none());
        assert_eq!(comments[1].body(), "second");
        assert!(comments[1].created_at.is_some());
        assert!(comments[1].updated_at.is_none());
    }

    #[test]
    fn empty_listing_decodes_to_nothing() {
        assert!(decode_comment_page("[]").unwrap().is_empty());
    }

    #[test]
    fn error_objects_do_not_decode() {
        assert!(decode_pull_page(r#"{"message": "Not Found"}"#).is_err());
        assert!(decode_pull_page("[{\"number\": ").is_err());
    }
}
