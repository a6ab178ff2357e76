//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the one chat bridge built at start-up. The bridge carries no
//! per-request fields, so handlers share it read-only.

use std::sync::Arc;

use crate::services::bridge::ChatBridge;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the bridge is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<ChatBridge>,
}

impl AppState {
    #[must_use]
    pub fn new(bridge: ChatBridge) -> Self {
        Self { bridge: Arc::new(bridge) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
