//! Axum route handlers for persona insights.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::list_persona_insights;
use crate::errors::AppError;
use crate::models::insight::PersonaInsightRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightQuery {
    pub icp_id: Option<i32>,
}

/// GET /api/insights/:persona?icpId=
pub async fn handle_list_insights(
    State(state): State<AppState>,
    Path(persona): Path<String>,
    Query(params): Query<InsightQuery>,
) -> Result<Json<Vec<PersonaInsightRow>>, AppError> {
    let persona = persona.trim();
    if persona.is_empty() {
        return Err(AppError::Validation("persona is required".to_string()));
    }

    let insights = list_persona_insights(&state.db, persona, params.icp_id).await?;
    Ok(Json(insights))
}
