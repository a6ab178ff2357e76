//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the three bridge endpoints under a single Axum router. Any front
//! end (browser, dashboard, terminal) may call them; CORS is open so a
//! page served from elsewhere can reach the surface.

pub mod chat;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(chat::health))
        .route("/chat", post(chat::chat))
        .route("/chat_messageonly", post(chat::chat_message_only))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
