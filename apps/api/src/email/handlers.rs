//! Axum route handlers for the Email API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::email::campaigns::{campaign_totals, count_campaign, log_campaign, CampaignCounts};
use crate::email::{EmailStats, LeadRecipient, SendReport};
use crate::errors::AppError;
use crate::models::campaign::CampaignTotals;
use crate::state::AppState;

const MAX_STATS_DAYS: i64 = 90;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body_template: String,
    #[serde(default)]
    pub leads: Vec<LeadRecipient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishCampaignRequest {
    pub user_id: Option<i32>,
    #[serde(default)]
    pub subject: String,
    pub leads: Option<Vec<LeadRecipient>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

/// POST /api/email/send
///
/// Sends one personalized email per lead through Brevo.
pub async fn handle_send_campaign(
    State(state): State<AppState>,
    Json(request): Json<SendCampaignRequest>,
) -> Result<Json<SendReport>, AppError> {
    let report = state
        .mailer
        .send_personalized_emails(&request.subject, &request.body_template, &request.leads)
        .await?;
    Ok(Json(report))
}

/// POST /api/email/publish
///
/// Records campaign counters without sending anything.
pub async fn handle_publish_campaign(
    State(state): State<AppState>,
    Json(request): Json<PublishCampaignRequest>,
) -> Result<Json<CampaignCounts>, AppError> {
    let (Some(user_id), Some(leads)) = (request.user_id, request.leads.as_deref()) else {
        return Err(AppError::Validation(
            "userId, subject and leads are required".to_string(),
        ));
    };
    if request.subject.trim().is_empty() {
        return Err(AppError::Validation(
            "userId, subject and leads are required".to_string(),
        ));
    }

    let counts = count_campaign(leads);
    log_campaign(&state.db, user_id, &request.subject, &counts).await?;
    Ok(Json(counts))
}

/// GET /api/email/stats?userId=
pub async fn handle_campaign_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CampaignTotals>, AppError> {
    let totals = campaign_totals(&state.db, params.user_id).await?;
    Ok(Json(totals))
}

/// GET /api/email/brevo-stats?days=
pub async fn handle_brevo_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<EmailStats>, AppError> {
    let days = params.days.unwrap_or(1);
    if !(0..=MAX_STATS_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "days must be between 0 and {MAX_STATS_DAYS}"
        )));
    }
    let stats = state.mailer.aggregated_stats(days).await?;
    Ok(Json(stats))
}
