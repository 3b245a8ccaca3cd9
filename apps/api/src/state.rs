use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, stubs in tests.
    pub model: Arc<dyn ChatModel>,
    pub config: Config,
}
