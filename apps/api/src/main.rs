mod config;
mod cv;
mod errors;
mod export;
mod extraction;
mod llm_client;
mod routes;
mod state;
mod template;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::cv::structurer::LlmCvStructurer;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::template::Template;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Booster v{}", env!("CARGO_PKG_VERSION"));

    // Load the CV template once; a configured template that cannot be loaded is fatal
    let template = match &config.template_path {
        Some(path) => {
            info!("Loading CV template from {}", path.display());
            Template::from_file(path)?
        }
        None => Template::builtin()?,
    };
    info!("CV template ready");

    // Initialize LLM client
    let llm = LlmClient::new(&config)?;
    info!("LLM client initialized (model: {})", config.llm_model);

    // Build app state
    let state = AppState {
        structurer: Arc::new(LlmCvStructurer::new(llm)),
        template: Arc::new(template),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
