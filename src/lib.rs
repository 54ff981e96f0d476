// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod classify;
pub mod config;
pub mod ingest;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classify::{classify, Category, Classification, Classifier, ImpactLevel};
pub use crate::ingest::feeds::Feed;
pub use crate::ingest::types::{ClassifiedArticle, NewsArticle, NewsProvider};
pub use crate::ingest::NewsPipeline;

/// Build the HTTP app from config file + environment (no metrics route).
///
/// ```ignore
/// let app = cockpit_news::app()?;
/// ```
pub fn app() -> anyhow::Result<axum::Router> {
    let state = AppState::from_env()?;
    if !state.pipeline().is_configured() {
        tracing::warn!("no news API key set; feeds will report not_configured");
    }
    Ok(router(state))
}
