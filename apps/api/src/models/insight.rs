use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    PainPoint,
    Outcome,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::PainPoint => "pain_point",
            InsightType::Outcome => "outcome",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonaInsightRow {
    pub id: i32,
    pub icp_id: i32,
    pub industry: String,
    pub persona: String,
    pub title: String,
    pub description: String,
    pub relevance_score: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub insight_type: String,
    pub is_custom: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
