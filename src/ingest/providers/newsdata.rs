// src/ingest/providers/newsdata.rs
//! NewsData.io `latest` endpoint. Primary provider.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use tracing::debug;

use crate::config::NewsConfig;
use crate::ingest::normalize_text;
use crate::ingest::providers::{build_http_client, excerpt, parse_timestamp};
use crate::ingest::types::{title_id, KeywordsField, NewsArticle, NewsProvider};

pub const NEWSDATA_URL: &str = "https://newsdata.io/api/1/latest";
const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    results: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Item {
    article_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    keywords: Option<KeywordsField>,
    #[serde(default)]
    category: Option<Vec<Option<String>>>,
    source_id: Option<String>,
    source_name: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    link: Option<String>,
}

impl Item {
    fn into_article(self) -> NewsArticle {
        let title = normalize_text(self.title.as_deref().unwrap_or_default());
        let id = self
            .article_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| title_id(&title));
        NewsArticle {
            id,
            description: normalize_text(self.description.as_deref().unwrap_or_default()),
            keywords: self.keywords.map(KeywordsField::into_vec).unwrap_or_default(),
            source_categories: self
                .category
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            source_name: non_blank(self.source_name)
                .or_else(|| non_blank(self.source_id))
                .unwrap_or_default(),
            published_at: self.pub_date.as_deref().and_then(parse_timestamp),
            url: self.link.unwrap_or_default(),
            title,
        }
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Map a NewsData response body onto articles.
/// A non-`success` status is an error carrying the provider message.
pub fn parse_response(body: &str) -> Result<Vec<NewsArticle>> {
    let t0 = std::time::Instant::now();
    let env: Envelope = serde_json::from_str(body).context("parsing newsdata json")?;
    if env.status != "success" {
        let msg = env
            .results
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        bail!("newsdata status '{}': {}", env.status, msg);
    }
    let raw: Vec<serde_json::Value> = if env.results.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(env.results).context("parsing newsdata results")?
    };
    // A malformed item is skipped, not the whole page.
    let out: Vec<NewsArticle> = raw
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<Item>(v) {
            Ok(item) => Some(item.into_article()),
            Err(e) => {
                debug!(error = %e, "newsdata: skipping malformed result");
                None
            }
        })
        .collect();

    histogram!("news_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    Ok(out)
}

pub struct NewsDataProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
}

impl NewsDataProvider {
    pub fn new(cfg: &NewsConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(cfg.http_timeout_secs)?,
            api_key: cfg.newsdata_api_key.clone(),
            base_url: NEWSDATA_URL.to_string(),
            language: cfg.language.clone(),
        })
    }

    /// Point at another endpoint (local test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl NewsProvider for NewsDataProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("newsdata api key not configured"))?;
        let size = limit.clamp(1, MAX_PAGE_SIZE).to_string();

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apikey", key),
                ("q", query),
                ("language", self.language.as_str()),
                ("size", size.as_str()),
            ])
            .send()
            .await
            // the url carries the api key
            .map_err(|e| e.without_url())
            .context("newsdata http get()")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("newsdata http .text()")?;
        if !status.is_success() {
            counter!("news_provider_http_errors_total", "provider" => "newsdata").increment(1);
            bail!("newsdata http {}: {}", status, excerpt(&body));
        }

        let mut out = parse_response(&body)?;
        out.truncate(limit);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "newsdata"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
