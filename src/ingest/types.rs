// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{Category, Classification, ImpactLevel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String, // provider id, else title-derived (see `title_id`)
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub source_categories: Vec<String>,
    pub source_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl NewsArticle {
    /// Keywords joined into one string for the classifier corpus.
    pub fn keywords_text(&self) -> String {
        self.keywords.join(" ")
    }

    /// True when title, description and source name are all present.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.source_name.trim().is_empty()
    }
}

/// Stable id for articles the provider did not assign one to.
/// Equal titles produce equal ids, so deduplication falls back to the title.
pub fn title_id(title: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(title.trim().as_bytes());
    let mut out = String::with_capacity(14);
    out.push_str("t-");
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedArticle {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub category: Category,
    pub impact_level: ImpactLevel,
    pub relevance_score: f32,
}

impl ClassifiedArticle {
    pub fn new(article: NewsArticle, c: Classification) -> Self {
        Self {
            article,
            category: c.category,
            impact_level: c.impact_level,
            relevance_score: c.relevance_score,
        }
    }
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Search for `query`, returning at most `limit` articles.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>>;
    fn name(&self) -> &'static str;
    /// False when no API key is set; the pipeline skips such providers.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Keywords as providers send them: a list, or one comma-separated string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeywordsField {
    List(Vec<String>),
    Text(String),
}

impl KeywordsField {
    pub fn into_vec(self) -> Vec<String> {
        let raw = match self {
            KeywordsField::List(v) => v,
            KeywordsField::Text(s) => s.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }
}
