use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::llm_client::LlmService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Agents and tasks are built per request; only the LLM client is shared.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmService>,
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
