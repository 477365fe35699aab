//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{LlmCompletionAdapter, SystemClipboardAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::{AppState, SessionStore}},
};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::Router;
use genui_core::Generator;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    if !config.clipboard_is_local() {
        warn!(
            bind = %config.bind_address,
            "Not bound to loopback; copy writes the server host clipboard, not the browser's"
        );
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail until it is provided");
    }

    // --- 2. Initialize Service Adapters ---
    let completion = Arc::new(LlmCompletionAdapter::new(
        &config.completion_api_base,
        config.gemini_api_key.as_deref(),
        config.completion_model.clone(),
    ));
    let clipboard = Arc::new(SystemClipboardAdapter::new(
        config.clipboard_command.as_deref(),
    ));
    info!(model = %config.completion_model, "Completion adapter ready");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        sessions: SessionStore::new(config.session_idle_ttl),
        generator: Generator::new(completion),
        clipboard,
    });

    let allowed_origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
