//! Strategic Cockpit news service: binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use cockpit_news::config::NewsConfig;
use cockpit_news::metrics::{metrics_enabled, Metrics};
use cockpit_news::{router, AppState, NewsPipeline};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default, JSON when LOG_FORMAT=json. Filter via RUST_LOG.
/// Uses `try_init` because the Shuttle runtime may already own the subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cockpit_news=info,warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = NewsConfig::load_default()?;
    let pipeline = NewsPipeline::from_config(&cfg)?;
    tracing::info!(
        configured = pipeline.is_configured(),
        delay_ms = cfg.request_delay_ms,
        per_query_limit = cfg.per_query_limit,
        extra_terms = cfg.extra_domain_terms.len(),
        "news pipeline ready"
    );

    let mut app = router(AppState::new(pipeline));
    if metrics_enabled() {
        let m = Metrics::init(cfg.request_delay_ms)?;
        app = app.merge(m.router());
    }

    Ok(app.into())
}
