use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::classify::Classification;
use crate::config::NewsConfig;
use crate::ingest::feeds::Feed;
use crate::ingest::types::KeywordsField;
use crate::ingest::NewsPipeline;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<NewsPipeline>,
}

impl AppState {
    pub fn new(pipeline: NewsPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Config file + environment, as the binary does it.
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = NewsConfig::load_default()?;
        Ok(Self::new(NewsPipeline::from_config(&cfg)?))
    }

    pub fn pipeline(&self) -> &NewsPipeline {
        &self.pipeline
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news/{feed}", get(news_feed))
        .route("/api/classify", post(classify_article))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct FeedQuery {
    #[serde(default)]
    limit: Option<usize>,
}

async fn news_feed(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(q): Query<FeedQuery>,
) -> Response {
    let Some(feed) = Feed::from_slug(&slug) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown feed '{slug}'") })),
        )
            .into_response();
    };
    let resp = state.pipeline.run(feed, q.limit).await;
    Json(resp).into_response()
}

#[derive(serde::Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ClassifyReq {
    title: Option<String>,
    description: Option<String>,
    keywords: Option<KeywordsField>,
    source_categories: Option<Vec<String>>,
}

async fn classify_article(
    State(state): State<AppState>,
    Json(body): Json<ClassifyReq>,
) -> Json<Classification> {
    let keywords = body
        .keywords
        .map(KeywordsField::into_vec)
        .unwrap_or_default()
        .join(" ");
    let c = state.pipeline.classifier().classify(
        body.title.as_deref().unwrap_or_default(),
        body.description.as_deref().unwrap_or_default(),
        &keywords,
        &body.source_categories.unwrap_or_default(),
    );
    Json(c)
}
