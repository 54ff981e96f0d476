// src/ingest/providers/mod.rs
pub mod fixture;
pub mod newsapi;
pub mod newsdata;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::Duration;

pub(crate) const USER_AGENT: &str = "cockpit-news/0.1";

/// Shared reqwest client setup for all HTTP providers.
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("building reqwest client")
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) and RFC 2822.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Short excerpt of an error body for log/error messages.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}
