use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::email::LeadRecipient;
use crate::models::campaign::CampaignTotals;

/// Counters recorded for one published campaign.
/// Delivery tracking is not wired up, so delivered mirrors sent and bounces stay 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCounts {
    pub sent: i32,
    pub skipped: i32,
    pub delivered: i32,
    pub soft_bounces: i32,
    pub hard_bounces: i32,
    pub tracked: i32,
}

pub fn count_campaign(leads: &[LeadRecipient]) -> CampaignCounts {
    let sent = leads
        .iter()
        .filter(|l| l.email.as_deref().is_some_and(|e| !e.trim().is_empty()))
        .count() as i32;
    CampaignCounts {
        sent,
        skipped: leads.len() as i32 - sent,
        delivered: sent,
        ..Default::default()
    }
}

/// Records a campaign's counters.
pub async fn log_campaign(
    pool: &PgPool,
    user_id: i32,
    subject: &str,
    counts: &CampaignCounts,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO email_campaigns
            (user_id, subject, sent_count, skipped_count, delivered_count,
             soft_bounce_count, hard_bounce_count, tracked_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(user_id)
    .bind(subject)
    .bind(counts.sent)
    .bind(counts.skipped)
    .bind(counts.delivered)
    .bind(counts.soft_bounces)
    .bind(counts.hard_bounces)
    .bind(counts.tracked)
    .execute(pool)
    .await?;

    info!(
        "Logged campaign for user {user_id}: sent={}, skipped={}",
        counts.sent, counts.skipped
    );
    Ok(())
}

/// Sums campaign counters, for one user or across all users.
pub async fn campaign_totals(
    pool: &PgPool,
    user_id: Option<i32>,
) -> Result<CampaignTotals, sqlx::Error> {
    sqlx::query_as::<_, CampaignTotals>(
        r#"
        SELECT
            COUNT(*)::int AS total_campaigns,
            COALESCE(SUM(sent_count), 0)::int AS total_sent,
            COALESCE(SUM(skipped_count), 0)::int AS total_skipped,
            COALESCE(SUM(delivered_count), 0)::int AS total_delivered,
            COALESCE(SUM(soft_bounce_count), 0)::int AS total_soft_bounces,
            COALESCE(SUM(hard_bounce_count), 0)::int AS total_hard_bounces,
            COALESCE(SUM(tracked_count), 0)::int AS total_tracked,
            MAX(created_at) AS last_campaign_at
        FROM email_campaigns
        WHERE ($1::int IS NULL OR user_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
