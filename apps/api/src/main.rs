mod analysis;
mod config;
mod errors;
mod extract;
mod jobs;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::jobs::dispatcher::JobDispatcher;
use crate::jobs::handlers::MAX_FILE_BYTES;
use crate::jobs::store::{JobStore, RedisJobStore};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter_directive(&config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Redis-backed job store
    let store: Arc<dyn JobStore> = Arc::new(RedisJobStore::connect(&config.redis_url).await?);
    info!("Job store connected");

    // Initialize the Gemini client and analysis pipeline
    let llm = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let dispatcher = JobDispatcher::new(Arc::clone(&store), AnalysisClient::new(Arc::new(llm)));

    // Build app state
    let state = AppState { dispatcher, store };

    // Build router. Body limit sits above the 5 MB application limit so the
    // handler, not the framework, produces the 400.
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(MAX_FILE_BYTES + 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fallback filter when `RUST_LOG` is unset. Tracing targets carry the crate
/// name with underscores, not the hyphenated package name; a directive built
/// from the package name would match no events at all.
fn default_filter_directive(level: &str) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_directive_uses_underscored_crate_name() {
        let directive = default_filter_directive("info");
        assert_eq!(directive, "jobmatch_api=info");
        assert!(!directive.contains('-'));
    }

    #[test]
    fn default_filter_directive_parses_as_env_filter() {
        assert!(EnvFilter::try_new(default_filter_directive("debug")).is_ok());
    }
}
