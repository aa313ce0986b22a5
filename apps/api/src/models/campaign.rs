use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Aggregated campaign counters for a user's dashboard.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CampaignTotals {
    pub total_campaigns: i32,
    pub total_sent: i32,
    pub total_skipped: i32,
    pub total_delivered: i32,
    pub total_soft_bounces: i32,
    pub total_hard_bounces: i32,
    pub total_tracked: i32,
    pub last_campaign_at: Option<DateTime<Utc>>,
}
