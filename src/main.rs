//! Resume agent - conversational front door for a portfolio site
//!
//! Collects a visitor's contact details, answers questions about a fixed
//! resume, falls back to a generative model for open-ended questions within a
//! per-session quota, and emails the transcript to the resume owner.

mod api;
mod config;
mod llm;
mod notifier;
mod resume;
mod runtime;
mod session;
mod state_machine;
mod system_prompt;

use api::{cors_layer, create_router, AppState};
use config::AppConfig;
use llm::{GeminiService, LlmService, LoggingService, UnconfiguredService};
use notifier::{EmailJsNotifier, LogNotifier, TranscriptNotifier};
use resume::ResumeProfile;
use runtime::{ConversationEngine, LlmTextGenerator};
use state_machine::SessionContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set
    let dotenv_path = dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resume_agent=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Some(path) = dotenv_path {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    // Configuration
    let config = AppConfig::from_env()?;

    let profile = match &config.resume_profile_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading resume profile");
            ResumeProfile::load(path)?
        }
        None => ResumeProfile::default(),
    };

    // Text generation service
    let llm_service: Arc<dyn LlmService> =
        if config.llm.gemini_api_key.is_some() || config.llm.gateway.is_some() {
            let gemini = GeminiService::new(
                config.llm.gemini_api_key.clone(),
                &config.llm.model,
                config.llm.gateway.as_deref(),
                config.llm.timeout,
            )?;
            tracing::info!(
                model = %config.llm.model,
                gateway = config.llm.gateway.is_some(),
                "Gemini generation enabled"
            );
            Arc::new(LoggingService::new(Arc::new(gemini)))
        } else {
            tracing::warn!("Neither GEMINI_API_KEY nor LLM_GATEWAY set; open-ended questions will get the fallback reply");
            Arc::new(UnconfiguredService)
        };

    // Transcript notifier
    let notifier: Arc<dyn TranscriptNotifier> = match &config.emailjs {
        Some(emailjs) => Arc::new(EmailJsNotifier::new(emailjs.clone(), config.notify_timeout)?),
        None => {
            tracing::warn!("EmailJS not configured; transcripts will only be logged");
            Arc::new(LogNotifier)
        }
    };
    tracing::info!(notifier = notifier.name(), "Transcript notifier ready");

    tracing::info!(
        profile = %profile.name,
        model_call_cap = config.model_call_cap,
        origins = ?config.allowed_origins,
        "Starting resume agent"
    );

    let engine = Arc::new(ConversationEngine::new(
        SessionContext::new(Arc::new(profile), config.model_call_cap),
        LlmTextGenerator::new(llm_service, config.llm.timeout),
        notifier,
        config.notify_timeout,
    ));

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(AppState::new(engine.clone()))
        .layer(cors_layer(&config.allowed_origins))
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Resume agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Waiting for pending transcript notifications");
    engine.flush_notifications().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
