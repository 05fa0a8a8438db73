mod analysis;
mod catalog;
mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod recommend;
mod routes;
mod scoring;
mod state;
mod survey_client;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recommend::OpenAiRecommender;
use crate::routes::build_router;
use crate::state::AppState;
use crate::survey_client::SurveyClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Recommendation Engine API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize survey API client
    let survey = SurveyClient::new(config.survey_api_base_url.clone(), &config.survey_api_user);
    info!("Survey client initialized ({})", config.survey_api_base_url);

    // Initialize LLM-backed recommender
    let llm = LlmClient::new(config.openai_api_key.clone());
    let recommender = Arc::new(OpenAiRecommender::new(llm));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState { survey, recommender };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
