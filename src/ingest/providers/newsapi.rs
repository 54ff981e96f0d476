// src/ingest/providers/newsapi.rs
//! NewsAPI.org `everything` endpoint. Fallback provider.
//! Articles carry no provider id, keywords or categories.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::config::NewsConfig;
use crate::ingest::normalize_text;
use crate::ingest::providers::{build_http_client, excerpt, parse_timestamp};
use crate::ingest::types::{title_id, NewsArticle, NewsProvider};

pub const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    #[serde(default)]
    source: Option<Source>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Source {
    name: Option<String>,
}

/// Map a NewsAPI response body onto articles.
pub fn parse_response(body: &str) -> Result<Vec<NewsArticle>> {
    let t0 = std::time::Instant::now();
    let env: Envelope = serde_json::from_str(body).context("parsing newsapi json")?;
    if env.status != "ok" {
        bail!(
            "newsapi status '{}' ({}): {}",
            env.status,
            env.code.as_deref().unwrap_or("-"),
            env.message.as_deref().unwrap_or("unknown error")
        );
    }

    let out: Vec<NewsArticle> = env
        .articles
        .into_iter()
        // NewsAPI marks takedowns with this placeholder title
        .filter(|it| it.title.as_deref() != Some("[Removed]"))
        .map(|it| {
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            NewsArticle {
                id: title_id(&title),
                description: normalize_text(it.description.as_deref().unwrap_or_default()),
                keywords: Vec::new(),
                source_categories: Vec::new(),
                source_name: it
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                published_at: it.published_at.as_deref().and_then(parse_timestamp),
                url: it.url.unwrap_or_default(),
                title,
            }
        })
        .collect();

    histogram!("news_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    Ok(out)
}

pub struct NewsApiProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
    lookback_days: u32,
}

impl NewsApiProvider {
    pub fn new(cfg: &NewsConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(cfg.http_timeout_secs)?,
            api_key: cfg.newsapi_api_key.clone(),
            base_url: NEWSAPI_URL.to_string(),
            language: cfg.language.clone(),
            lookback_days: cfg.lookback_days,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn from_date(&self) -> String {
        let from = Utc::now() - chrono::Duration::days(i64::from(self.lookback_days));
        from.format("%Y-%m-%d").to_string()
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("newsapi api key not configured"))?;
        let page_size = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let from = self.from_date();

        let resp = self
            .http
            .get(&self.base_url)
            .header("X-Api-Key", key)
            .query(&[
                ("q", query),
                ("language", self.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("from", from.as_str()),
            ])
            .send()
            .await
            .context("newsapi http get()")?;

        let status = resp.status();
        let body = resp.text().await.context("newsapi http .text()")?;
        if !status.is_success() {
            counter!("news_provider_http_errors_total", "provider" => "newsapi").increment(1);
            bail!("newsapi http {}: {}", status, excerpt(&body));
        }

        let mut out = parse_response(&body)?;
        out.truncate(limit);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
