// src/ingest/mod.rs
//! Fetch → dedupe → filter → classify → rank → truncate.
//!
//! One pipeline serves every feed; feeds differ only in their query list and
//! maximum size, providers only in how they map wire fields.

pub mod feeds;
pub mod providers;
pub mod response;
pub mod types;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::classify::Classifier;
use crate::config::NewsConfig;
use crate::ingest::feeds::Feed;
use crate::ingest::providers::{
    fixture::FixtureProvider, newsapi::NewsApiProvider, newsdata::NewsDataProvider,
};
use crate::ingest::response::{FeedStatus, NewsResponse};
use crate::ingest::types::{ClassifiedArticle, NewsArticle, NewsProvider};

/// Score deltas at or below this are treated as ties and resolved by recency.
pub const SCORE_TIE_BAND: f32 = 0.1;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_queries_total", "Search requests issued to providers.");
        describe_counter!("news_query_errors_total", "Search requests that failed.");
        describe_counter!(
            "news_articles_fetched_total",
            "Raw articles returned by providers."
        );
        describe_counter!("news_dedup_total", "Articles removed as duplicates.");
        describe_counter!(
            "news_filtered_total",
            "Articles dropped for missing title, description or source."
        );
        describe_counter!(
            "news_provider_fallbacks_total",
            "Times the pipeline moved on to a fallback provider."
        );
        describe_histogram!("news_pipeline_ms", "Pipeline run time in milliseconds.");
        describe_histogram!("news_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "news_pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| {
        regex::Regex::new(r"(?is)</?[^>]+>").expect("valid tag regex")
    });
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("valid whitespace regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 2000 chars
    if out.chars().count() > 2000 {
        out = out.chars().take(2000).collect();
    }

    out
}

/// Keep the first article per id. Returns (kept, removed).
pub fn dedupe_articles(raw: Vec<NewsArticle>) -> (Vec<NewsArticle>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(raw.len());
    let mut removed = 0usize;
    for a in raw {
        if !seen.insert(a.id.clone()) {
            removed += 1;
            continue;
        }
        keep.push(a);
    }
    (keep, removed)
}

/// Drop articles missing title, description or source. Returns (kept, removed).
pub fn filter_incomplete(articles: Vec<NewsArticle>) -> (Vec<NewsArticle>, usize) {
    let before = articles.len();
    let kept: Vec<NewsArticle> = articles.into_iter().filter(NewsArticle::is_complete).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Score in hundredths; summed f32 weights drift off the 0.05 grid.
fn score_points(score: f32) -> i32 {
    (score * 100.0).round() as i32
}

/// Relevance first when the gap exceeds the tie band, else newest first.
/// Missing timestamps sort as oldest.
pub fn compare_ranked(a: &ClassifiedArticle, b: &ClassifiedArticle) -> Ordering {
    let diff = score_points(b.relevance_score) - score_points(a.relevance_score);
    if diff.abs() > score_points(SCORE_TIE_BAND) {
        return diff.cmp(&0);
    }
    b.article.published_at.cmp(&a.article.published_at)
}

/// Stable insertion ranking by `compare_ranked`.
///
/// The tie band makes the comparator non-transitive, which `slice::sort_by`
/// is allowed to reject with a panic, so the order is built by insertion.
pub fn rank_articles(articles: Vec<ClassifiedArticle>) -> Vec<ClassifiedArticle> {
    let mut out: Vec<ClassifiedArticle> = Vec::with_capacity(articles.len());
    for a in articles {
        let pos = out
            .iter()
            .position(|b| compare_ranked(&a, b) == Ordering::Less)
            .unwrap_or(out.len());
        out.insert(pos, a);
    }
    out
}

fn short_id(a: &NewsArticle) -> String {
    a.id.chars().take(16).collect()
}

#[derive(Debug, Default)]
pub struct ProcessOutcome {
    pub articles: Vec<ClassifiedArticle>,
    pub dedup: usize,
    pub filtered: usize,
}

/// Pure post-fetch stage: dedupe, filter, classify, rank, truncate to `max`.
pub fn process(raw: Vec<NewsArticle>, classifier: &Classifier, max: usize) -> ProcessOutcome {
    let (unique, dedup) = dedupe_articles(raw);
    let (complete, filtered) = filter_incomplete(unique);

    let classified = complete
        .into_iter()
        .map(|a| {
            let c = classifier.classify(
                &a.title,
                &a.description,
                &a.keywords_text(),
                &a.source_categories,
            );
            debug!(
                target: "classify",
                id = %short_id(&a),
                category = %c.category,
                impact = %c.impact_level,
                score = c.relevance_score,
                "classified"
            );
            ClassifiedArticle::new(a, c)
        })
        .collect::<Vec<_>>();

    let mut articles = rank_articles(classified);
    articles.truncate(max);
    ProcessOutcome {
        articles,
        dedup,
        filtered,
    }
}

/// Raw results of running every query against one provider.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub articles: Vec<NewsArticle>,
    pub queries: usize,
    pub failed: usize,
}

impl FetchOutcome {
    pub fn all_failed(&self) -> bool {
        self.queries > 0 && self.failed == self.queries
    }
}

/// Issue every query sequentially, sleeping `delay` between requests.
/// A failed query is logged and skipped.
pub async fn fetch_all(
    provider: &dyn NewsProvider,
    queries: &[&str],
    per_query_limit: usize,
    delay: Duration,
) -> FetchOutcome {
    ensure_metrics_described();

    let mut outcome = FetchOutcome::default();
    for (i, q) in queries.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome.queries += 1;
        counter!("news_queries_total", "provider" => provider.name()).increment(1);
        match provider.search(q, per_query_limit).await {
            Ok(mut v) => {
                counter!("news_articles_fetched_total").increment(v.len() as u64);
                outcome.articles.append(&mut v);
            }
            Err(e) => {
                outcome.failed += 1;
                warn!(error = ?e, provider = provider.name(), query = *q, "news query failed");
                counter!("news_query_errors_total", "provider" => provider.name()).increment(1);
            }
        }
    }
    outcome
}

pub struct NewsPipeline {
    providers: Vec<Arc<dyn NewsProvider>>,
    classifier: Classifier,
    request_delay: Duration,
    per_query_limit: usize,
}

impl NewsPipeline {
    /// `providers` in priority order: the first that yields articles wins.
    pub fn new(providers: Vec<Arc<dyn NewsProvider>>, classifier: Classifier) -> Self {
        Self {
            providers,
            classifier,
            request_delay: Duration::from_millis(1000),
            per_query_limit: 10,
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_per_query_limit(mut self, limit: usize) -> Self {
        self.per_query_limit = limit.max(1);
        self
    }

    /// NewsData primary, NewsAPI fallback; or the fixture provider when
    /// `fixture_path` is set.
    pub fn from_config(cfg: &NewsConfig) -> Result<Self> {
        let providers: Vec<Arc<dyn NewsProvider>> = match &cfg.fixture_path {
            Some(path) => {
                info!(path = %path.display(), "news: offline fixture mode");
                vec![Arc::new(FixtureProvider::from_path(path)?)]
            }
            None => vec![
                Arc::new(NewsDataProvider::new(cfg)?),
                Arc::new(NewsApiProvider::new(cfg)?),
            ],
        };
        let classifier = Classifier::with_extra_domain_terms(&cfg.extra_domain_terms);
        Ok(Self::new(providers, classifier)
            .with_request_delay(Duration::from_millis(cfg.request_delay_ms))
            .with_per_query_limit(cfg.per_query_limit))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn is_configured(&self) -> bool {
        self.providers.iter().any(|p| p.is_configured())
    }

    /// Run `feed` end to end. Never fails; degradations are reported in
    /// `metadata.status`.
    pub async fn run(&self, feed: Feed, limit: Option<usize>) -> NewsResponse {
        ensure_metrics_described();
        let t0 = Instant::now();
        let max = limit
            .map(|l| l.min(feed.max_articles()))
            .unwrap_or(feed.max_articles());

        let configured: Vec<Arc<dyn NewsProvider>> = self
            .providers
            .iter()
            .filter(|p| p.is_configured())
            .cloned()
            .collect();
        if configured.is_empty() {
            warn!(feed = feed.slug(), "no news provider configured");
            return NewsResponse::empty(
                feed,
                FeedStatus::NotConfigured,
                Some("no news API key configured".to_string()),
            );
        }

        let mut any_answered = false;
        for (i, provider) in configured.iter().enumerate() {
            if i > 0 {
                counter!("news_provider_fallbacks_total").increment(1);
                info!(feed = feed.slug(), provider = provider.name(), "falling back");
            }

            let fetched = fetch_all(
                &**provider,
                feed.queries(),
                self.per_query_limit,
                self.request_delay,
            )
            .await;
            if !fetched.all_failed() {
                any_answered = true;
            }
            if fetched.articles.is_empty() {
                continue;
            }

            let raw = fetched.articles.len();
            let out = process(fetched.articles, &self.classifier, max);

            counter!("news_dedup_total").increment(out.dedup as u64);
            counter!("news_filtered_total").increment(out.filtered as u64);
            histogram!("news_pipeline_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            gauge!("news_pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

            info!(
                target: "ingest",
                feed = feed.slug(),
                provider = provider.name(),
                raw,
                dedup = out.dedup,
                filtered = out.filtered,
                kept = out.articles.len(),
                failed_queries = fetched.failed,
                "news feed built"
            );
            return NewsResponse::served(feed, provider.name(), out.articles);
        }

        histogram!("news_pipeline_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        if any_answered {
            info!(feed = feed.slug(), "providers returned no articles");
            NewsResponse::empty(feed, FeedStatus::Ok, None)
        } else {
            warn!(feed = feed.slug(), "all news providers failed");
            NewsResponse::empty(
                feed,
                FeedStatus::Unavailable,
                Some("news providers unreachable".to_string()),
            )
        }
    }
}
