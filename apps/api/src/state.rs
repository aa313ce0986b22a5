use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::insights::PersonaInsightGenerator;
use crate::email::BrevoClient;
use crate::events::EventBus;
use crate::llm_client::LlmClient;
use crate::matching::selector::CandidateSelector;
use crate::queue::EmailQueue;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Ranks dataset companies against an ICP. Holds the shared dataset cache.
    pub selector: CandidateSelector,
    /// Pluggable insight generator. Default: TemplateInsightGenerator. Swap via ENABLE_LLM_INSIGHTS.
    pub insights: Arc<dyn PersonaInsightGenerator>,
    pub mailer: BrevoClient,
    pub queue: EmailQueue,
    pub events: EventBus,
}
