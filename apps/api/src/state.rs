use std::sync::Arc;

use crate::identity::Identity;
use crate::llm_client::TextGenerator;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one editing session this process serves.
    pub store: Arc<ResumeStore>,
    pub identity: Arc<Identity>,
    /// Pluggable text generator. Default: `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
}
