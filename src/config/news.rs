// src/config/news.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const ENV_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/news.toml";

pub const ENV_NEWSDATA_KEY: &str = "NEWSDATA_API_KEY";
pub const ENV_NEWSAPI_KEY: &str = "NEWSAPI_API_KEY";
/// Older deployments used this name for the NewsAPI key.
pub const ENV_NEWSAPI_KEY_ALIAS: &str = "NEWS_API_KEY";
pub const ENV_REQUEST_DELAY_MS: &str = "NEWS_REQUEST_DELAY_MS";
/// Serve a NewsData-format JSON file instead of calling providers.
pub const ENV_FIXTURE_PATH: &str = "NEWS_FIXTURE_PATH";

fn default_request_delay_ms() -> u64 {
    1000
}
fn default_per_query_limit() -> usize {
    10
}
fn default_language() -> String {
    "en".to_string()
}
fn default_lookback_days() -> u32 {
    7
}
fn default_http_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Pause between consecutive provider requests.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_per_query_limit")]
    pub per_query_limit: usize,
    #[serde(default = "default_language")]
    pub language: String,
    /// NewsAPI `from` window.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Company/industry terms scored like the built-in domain terms.
    #[serde(default)]
    pub extra_domain_terms: Vec<String>,
    /// Offline mode: when set, articles come from this file.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,

    /// Secrets come from the environment only.
    #[serde(skip)]
    pub newsdata_api_key: Option<String>,
    #[serde(skip)]
    pub newsapi_api_key: Option<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            per_query_limit: default_per_query_limit(),
            language: default_language(),
            lookback_days: default_lookback_days(),
            http_timeout_secs: default_http_timeout_secs(),
            extra_domain_terms: Vec::new(),
            fixture_path: None,
            newsdata_api_key: None,
            newsapi_api_key: None,
        }
    }
}

impl NewsConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: NewsConfig = toml::from_str(s).context("parsing news config toml")?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading news config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve config + env:
    /// 1) $NEWS_CONFIG_PATH (must exist)
    /// 2) config/news.toml
    /// 3) built-in defaults
    ///
    /// API keys and the delay override are then read from the environment.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
            if pb.exists() {
                Self::load_from_file(&pb)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        self.newsdata_api_key = non_empty_env(ENV_NEWSDATA_KEY);
        self.newsapi_api_key =
            non_empty_env(ENV_NEWSAPI_KEY).or_else(|| non_empty_env(ENV_NEWSAPI_KEY_ALIAS));
        if let Some(ms) = non_empty_env(ENV_REQUEST_DELAY_MS).and_then(|v| v.parse::<u64>().ok())
        {
            self.request_delay_ms = ms;
        }
        if let Some(p) = non_empty_env(ENV_FIXTURE_PATH) {
            self.fixture_path = Some(PathBuf::from(p));
        }
    }

    fn sanitize(&mut self) {
        if self.per_query_limit == 0 {
            self.per_query_limit = default_per_query_limit();
        }
        if self.http_timeout_secs == 0 {
            self.http_timeout_secs = default_http_timeout_secs();
        }
        self.language = self.language.trim().to_ascii_lowercase();
        if self.language.is_empty() {
            self.language = default_language();
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
