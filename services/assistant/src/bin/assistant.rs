//! services/assistant/src/bin/assistant.rs

use assistant_lib::{
    adapters::{FileConsentStore, OpenAiResolver, RulesResolver},
    config::{Config, ResolverKind},
    error::AppError,
    web::{health_handler, quick_actions_handler, ws_handler, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use sena_core::ports::{ConsentStore, ResponseResolver};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting assistant...");

    // --- 2. Initialize Service Adapters ---
    let resolver: Arc<dyn ResponseResolver> = match config.resolver {
        ResolverKind::Rules => {
            info!("Answering with the local rules resolver.");
            Arc::new(RulesResolver::new()?)
        }
        ResolverKind::Llm => {
            let openai_config = OpenAIConfig::new().with_api_key(
                config
                    .openai_api_key
                    .as_ref()
                    .ok_or_else(|| AppError::Internal("OPENAI_API_KEY is required".to_string()))?,
            );
            info!(model = %config.llm_model, "Answering with the LLM resolver.");
            Arc::new(OpenAiResolver::new(
                Client::with_config(openai_config),
                config.llm_model.clone(),
            ))
        }
    };

    let consent_store: Arc<dyn ConsentStore> =
        Arc::new(FileConsentStore::new(&config.consent_store_path));
    info!(
        "Consent is persisted at {}",
        config.consent_store_path.display()
    );

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        resolver,
        consent_store,
    });

    // --- 4. Create the Web Router ---
    let allowed_origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        AppError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::OPTIONS]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/quick-actions", get(quick_actions_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
