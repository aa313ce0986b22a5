//! Axum route handlers for the Leads API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::analysis::analyze_icp_with_dataset;
use crate::errors::AppError;
use crate::events::LeadEvent;
use crate::leads::{
    get_lead, insert_lead, list_leads, NewLead, ACTIVE_STATUS, DEFAULT_INDUSTRY,
    DEFAULT_LOCATION, DEFAULT_REVENUE,
};
use crate::matching::selector::CandidateCompany;
use crate::matching::IcpDefinition;
use crate::models::lead::LeadRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub profile_name: Option<String>,
    pub industry: Option<String>,
    pub revenue: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

impl CreateLeadRequest {
    /// Validates the request and fills in the dashboard defaults.
    pub fn into_new_lead(self) -> Result<NewLead, AppError> {
        let profile_name = self
            .profile_name
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::Validation("profile_name and userId are required".to_string()))?;
        let user_id = self
            .user_id
            .ok_or_else(|| AppError::Validation("profile_name and userId are required".to_string()))?;

        Ok(NewLead {
            user_id: Some(user_id),
            profile_name,
            industry: Some(or_default(self.industry, DEFAULT_INDUSTRY)),
            revenue: Some(or_default(self.revenue, DEFAULT_REVENUE)),
            location: Some(or_default(self.location, DEFAULT_LOCATION)),
            status: Some(ACTIVE_STATUS.to_string()),
            ..Default::default()
        })
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// GET /api/leads?userId=
pub async fn handle_list_leads(
    State(state): State<AppState>,
    Query(params): Query<LeadListQuery>,
) -> Result<Json<Vec<LeadRow>>, AppError> {
    let leads = list_leads(&state.db, params.user_id).await?;
    Ok(Json(leads))
}

/// POST /api/leads
///
/// Creates a manual lead and pushes it to connected dashboards.
pub async fn handle_create_lead(
    State(state): State<AppState>,
    Json(request): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadRow>), AppError> {
    let new_lead = request.into_new_lead()?;
    let lead = insert_lead(&state.db, &new_lead).await?;
    state.events.publish(LeadEvent::NewLead(lead.clone()));
    Ok((StatusCode::CREATED, Json(lead)))
}

/// POST /api/leads/:id/analyze
///
/// Runs ICP analysis for a stored lead: top companies plus persona insights.
pub async fn handle_analyze_lead(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CandidateCompany>>, AppError> {
    let lead = get_lead(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {id} not found")))?;

    let companies = analyze_icp_with_dataset(
        &state.db,
        &state.selector,
        state.insights.as_ref(),
        lead.id,
        &IcpDefinition::from(&lead),
    )
    .await?;

    Ok(Json(companies))
}
