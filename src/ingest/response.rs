// src/ingest/response.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ingest::feeds::Feed;
use crate::ingest::types::ClassifiedArticle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Ok,
    /// No provider has an API key; nothing was requested.
    NotConfigured,
    /// Every query of every configured provider failed.
    Unavailable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn of(articles: &[ClassifiedArticle]) -> Self {
        let ts = articles.iter().filter_map(|a| a.article.published_at);
        let (mut from, mut to) = (None, None);
        for t in ts {
            from = Some(from.map_or(t, |f: DateTime<Utc>| f.min(t)));
            to = Some(to.map_or(t, |x: DateTime<Utc>| x.max(t)));
        }
        Self { from, to }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsMetadata {
    pub feed: Feed,
    pub total_articles: usize,
    pub last_updated: DateTime<Utc>,
    pub date_range: DateRange,
    /// Provider that served the articles, or "none".
    pub source: String,
    pub status: FeedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<ClassifiedArticle>,
    pub metadata: NewsMetadata,
}

impl NewsResponse {
    pub fn served(feed: Feed, source: &str, articles: Vec<ClassifiedArticle>) -> Self {
        let metadata = NewsMetadata {
            feed,
            total_articles: articles.len(),
            last_updated: Utc::now(),
            date_range: DateRange::of(&articles),
            source: source.to_string(),
            status: FeedStatus::Ok,
            message: None,
        };
        Self { articles, metadata }
    }

    pub fn empty(feed: Feed, status: FeedStatus, message: Option<String>) -> Self {
        Self {
            articles: Vec::new(),
            metadata: NewsMetadata {
                feed,
                total_articles: 0,
                last_updated: Utc::now(),
                date_range: DateRange::default(),
                source: "none".to_string(),
                status,
                message,
            },
        }
    }
}
