pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as insights;
use crate::email::handlers as email;
use crate::events::handlers as events;
use crate::leads::handlers as leads;
use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::webhook::handlers as webhook;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ws", get(events::handle_events_socket))
        // Leads & ICP matching
        .route(
            "/api/leads",
            get(leads::handle_list_leads).post(leads::handle_create_lead),
        )
        .route("/api/leads/:id/matches", get(matching::handle_lead_matches))
        .route("/api/leads/:id/analyze", post(leads::handle_analyze_lead))
        .route("/api/icp/matches", post(matching::handle_adhoc_matches))
        .route("/api/insights/:persona", get(insights::handle_list_insights))
        // Intake
        .route("/api/webhooks/zapier", post(webhook::handle_zapier_webhook))
        // Email
        .route("/api/email/send", post(email::handle_send_campaign))
        .route("/api/email/publish", post(email::handle_publish_campaign))
        .route("/api/email/stats", get(email::handle_campaign_stats))
        .route("/api/email/brevo-stats", get(email::handle_brevo_stats))
        .with_state(state)
}
