mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use llm::config::{LlmConfig, LlmProviderKind, default_model};
use services::bridge::ChatBridge;
use services::gateway::ModelGateway;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .expect("invalid PORT");

    let config = LlmConfig::from_env().expect("invalid LLM configuration");
    let provider = config.provider;
    let max_tokens = config.max_tokens;
    let model = config.model.clone();

    let client = llm::LlmClient::from_config(config).expect("LLM client init failed");
    if client.has_api_key() {
        tracing::info!(?provider, %model, "LLM client initialized");
    } else {
        tracing::warn!(?provider, "LLM API key not set — model calls will fail until it is provided");
    }

    let mut gateway = ModelGateway::new(Arc::new(client), max_tokens);
    if provider == LlmProviderKind::Anthropic {
        gateway = gateway.with_health_model(default_model(provider));
    }
    let state = state::AppState::new(ChatBridge::new(gateway, model));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%bind_addr, %port, "chatbridge listening");
    axum::serve(listener, app).await.expect("server failed");
}
