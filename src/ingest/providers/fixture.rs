// src/ingest/providers/fixture.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

use crate::ingest::providers::newsdata;
use crate::ingest::types::{NewsArticle, NewsProvider};

/// Serves the same canned articles for every query. Offline mode and tests.
pub struct FixtureProvider {
    articles: Vec<NewsArticle>,
}

impl FixtureProvider {
    pub fn from_articles(articles: Vec<NewsArticle>) -> Self {
        Self { articles }
    }

    /// Parse a NewsData-format body once up front.
    pub fn from_newsdata_json(body: &str) -> Result<Self> {
        Ok(Self {
            articles: newsdata::parse_response(body)?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("reading news fixture {}", path.display()))?;
        Self::from_newsdata_json(&body)
    }
}

#[async_trait]
impl NewsProvider for FixtureProvider {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        Ok(self.articles.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
