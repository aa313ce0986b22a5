//! Axum route handler for the Zapier webhook.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::errors::AppError;
use crate::events::LeadEvent;
use crate::leads::insert_lead;
use crate::llm_client::prompts::GTM_STRATEGIST_SYSTEM;
use crate::state::AppState;
use crate::webhook::prompts::LEAD_EXTRACTION_PROMPT;
use crate::webhook::ExtractedLead;

#[derive(Debug, Deserialize)]
pub struct ZapierWebhookRequest {
    pub raw_content: Option<String>,
    pub source_email: Option<String>,
}

/// POST /api/webhooks/zapier
///
/// Extracts a lead from the raw message, stores it, broadcasts it and queues
/// a welcome email.
pub async fn handle_zapier_webhook(
    State(state): State<AppState>,
    Json(request): Json<ZapierWebhookRequest>,
) -> Result<Json<Value>, AppError> {
    let raw_content = request
        .raw_content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("raw_content is required".to_string()))?;

    let prompt = LEAD_EXTRACTION_PROMPT.replace("{raw_content}", &raw_content);
    let extracted: ExtractedLead = state
        .llm
        .call_json(&prompt, GTM_STRATEGIST_SYSTEM)
        .await
        .map_err(|e| {
            error!("Webhook lead extraction failed: {e}");
            e
        })?;

    let new_lead = extracted.into_new_lead(&raw_content, request.source_email);
    let lead = insert_lead(&state.db, &new_lead).await?;

    state.events.publish(LeadEvent::NewLead(lead.clone()));
    let job_id = state.queue.add_email_job(lead.clone()).await?;
    info!("Webhook lead {} queued for welcome email (job {job_id})", lead.id);

    Ok(Json(json!({ "success": true, "lead": lead })))
}
