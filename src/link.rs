//! `Link` header pagination.
//!
//! GitHub describes neighbouring pages of a listing as
//! `<https://api.github.com/...&page=2>; rel="next", <...&page=9>; rel="last"`.

use reqwest::header::{HeaderMap, LINK};
use std::collections::HashMap;

/// Relation that drives continuation.
pub const NEXT: &str = "next";

/// Parse the `Link` header of a response into a relation -> URL map.
///
/// An absent header yields an empty map, meaning the page is the last one.
pub fn parse_link_header(headers: &HeaderMap) -> HashMap<String, String> {
    match headers.get(LINK).and_then(|value| value.to_str().ok()) {
        Some(value) => parse_links(value),
        None => HashMap::new(),
    }
}

/// Parse a raw `Link` header value.
///
/// Entries missing either the `<url>` or the quoted relation are skipped.
pub fn parse_links(value: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();

    for entry in value.split(',') {
        let mut parts = entry.split(';');
        let url = parts.next().and_then(extract_angle_bracketed);
        let rel = parts.next().and_then(extract_quoted);

        if let (Some(url), Some(rel)) = (url, rel) {
            links.insert(rel.to_string(), url.to_string());
        }
    }
    links
}

/// Text between the first `<` and the last `>`.
pub fn extract_angle_bracketed(text: &str) -> Option<&str> {
    between(text, '<', '>')
}

/// Text between the first and the last `"`.
pub fn extract_quoted(text: &str) -> Option<&str> {
    between(text, '"', '"')
}

fn between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)? + open.len_utf8();
    let end = text.rfind(close)?;
    (end >= start).then(|| &text[start..end])
}
