//! Axum route handlers for ICP matching.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::leads::get_lead;
use crate::matching::selector::{CandidateCompany, DEFAULT_CANDIDATE_COUNT};
use crate::matching::IcpDefinition;
use crate::state::AppState;

pub const DEFAULT_MATCH_LIMIT: usize = 100;
pub const MAX_MATCH_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AdHocMatchRequest {
    #[serde(flatten)]
    pub icp: IcpDefinition,
    pub limit: Option<usize>,
}

fn resolve_limit(limit: Option<usize>, default: usize) -> Result<usize, AppError> {
    match limit {
        None => Ok(default),
        Some(l) if (1..=MAX_MATCH_LIMIT).contains(&l) => Ok(l),
        Some(_) => Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_MATCH_LIMIT}"
        ))),
    }
}

/// GET /api/leads/:id/matches?limit=
///
/// Top dataset companies for a stored lead's ICP.
pub async fn handle_lead_matches(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<Vec<CandidateCompany>>, AppError> {
    let limit = resolve_limit(params.limit, DEFAULT_MATCH_LIMIT)?;
    let lead = get_lead(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {id} not found")))?;

    let companies = state
        .selector
        .get_candidates(&IcpDefinition::from(&lead), limit)
        .await?;
    Ok(Json(companies))
}

/// POST /api/icp/matches
///
/// Matches an ICP given inline, without persisting anything. Defaults to
/// `DEFAULT_CANDIDATE_COUNT` results.
pub async fn handle_adhoc_matches(
    State(state): State<AppState>,
    Json(request): Json<AdHocMatchRequest>,
) -> Result<Json<Vec<CandidateCompany>>, AppError> {
    let limit = resolve_limit(request.limit, DEFAULT_CANDIDATE_COUNT)?;
    let companies = state.selector.get_candidates(&request.icp, limit).await?;
    Ok(Json(companies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit_defaults_and_bounds() {
        assert_eq!(resolve_limit(None, DEFAULT_MATCH_LIMIT).unwrap(), DEFAULT_MATCH_LIMIT);
        assert_eq!(resolve_limit(None, DEFAULT_CANDIDATE_COUNT).unwrap(), 200);
        assert_eq!(resolve_limit(Some(1), DEFAULT_MATCH_LIMIT).unwrap(), 1);
        assert_eq!(
            resolve_limit(Some(MAX_MATCH_LIMIT), DEFAULT_MATCH_LIMIT).unwrap(),
            MAX_MATCH_LIMIT
        );
        assert!(resolve_limit(Some(0), DEFAULT_MATCH_LIMIT).is_err());
        assert!(resolve_limit(Some(MAX_MATCH_LIMIT + 1), DEFAULT_MATCH_LIMIT).is_err());
    }

    #[test]
    fn test_adhoc_request_flattens_icp_fields() {
        let req: AdHocMatchRequest = serde_json::from_value(serde_json::json!({
            "industry": "software", "location": "austin tx", "limit": 5
        }))
        .unwrap();
        assert_eq!(req.icp.industry.as_deref(), Some("software"));
        assert_eq!(req.icp.revenue, None);
        assert_eq!(req.limit, Some(5));
    }
}
