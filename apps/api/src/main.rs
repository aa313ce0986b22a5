mod analysis;
mod config;
mod dataset;
mod db;
mod email;
mod errors;
mod events;
mod leads;
mod llm_client;
mod matching;
mod models;
mod queue;
mod routes;
mod state;
mod webhook;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::insights::{
    LlmInsightGenerator, PersonaInsightGenerator, TemplateInsightGenerator,
};
use crate::config::Config;
use crate::dataset::loader::{CsvFileSource, DatasetCache};
use crate::db::create_pool;
use crate::email::BrevoClient;
use crate::events::EventBus;
use crate::llm_client::LlmClient;
use crate::matching::scorer::HeuristicScorer;
use crate::matching::selector::CandidateSelector;
use crate::queue::worker::MailWorker;
use crate::queue::EmailQueue;
use crate::routes::build_router;
use crate::state::AppState;

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

    info!("Starting LeadGen API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis-backed email queue
    let redis = redis::Client::open(config.redis_url.clone())?;
    let queue = EmailQueue::new(redis);
    info!("Redis client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Dataset is loaded on first use and shared by every request afterwards
    let dataset = Arc::new(DatasetCache::new(Arc::new(CsvFileSource::new(
        config.dataset_path.clone(),
    ))));
    let selector = CandidateSelector::new(dataset.clone(), Arc::new(HeuristicScorer));
    info!("Business dataset: {}", config.dataset_path.display());

    // Initialize insight generator (templates by default; swap via ENABLE_LLM_INSIGHTS)
    let insights: Arc<dyn PersonaInsightGenerator> = if config.enable_llm_insights {
        Arc::new(LlmInsightGenerator(llm.clone()))
    } else {
        Arc::new(TemplateInsightGenerator)
    };
    info!("Persona insight backend: {}", insights.backend());

    let mailer = BrevoClient::new(
        config.brevo_api_key.clone(),
        config.brevo_sender_email.clone(),
        config.brevo_sender_name.clone(),
    );

    // Background email worker
    tokio::spawn(MailWorker::new(queue.clone(), mailer.clone()).run());

    // Warm the dataset cache; a failure here is retried by the first request
    tokio::spawn(async move {
        if let Err(e) = dataset.load().await {
            warn!("Dataset warm-up failed: {e}");
        }
    });

    // Build app state
    let state = AppState {
        db,
        llm,
        selector,
        insights,
        mailer,
        queue,
        events: EventBus::new(),
    };

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .context("CORS_ORIGIN must be a valid header value")?;

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
