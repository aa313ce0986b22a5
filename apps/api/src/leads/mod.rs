// Leads double as ICP profiles: industry, location and revenue drive matching.

pub mod handlers;

use sqlx::PgPool;
use tracing::info;

use crate::models::lead::LeadRow;

pub const DEFAULT_INDUSTRY: &str = "General";
pub const DEFAULT_REVENUE: &str = "Unknown";
pub const DEFAULT_LOCATION: &str = "Global";
pub const ACTIVE_STATUS: &str = "Active";

/// Column values for a new lead row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLead {
    pub user_id: Option<i32>,
    pub profile_name: String,
    pub industry: Option<String>,
    pub revenue: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub raw_content: Option<String>,
    pub status: Option<String>,
}

pub async fn insert_lead(pool: &PgPool, lead: &NewLead) -> Result<LeadRow, sqlx::Error> {
    let row = sqlx::query_as::<_, LeadRow>(
        r#"
        INSERT INTO leads
            (user_id, profile_name, industry, revenue, location, email, raw_content, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(lead.user_id)
    .bind(&lead.profile_name)
    .bind(&lead.industry)
    .bind(&lead.revenue)
    .bind(&lead.location)
    .bind(&lead.email)
    .bind(&lead.raw_content)
    .bind(&lead.status)
    .fetch_one(pool)
    .await?;

    info!("Inserted lead {} ({})", row.id, row.profile_name);
    Ok(row)
}

/// Leads newest first, optionally restricted to one user.
pub async fn list_leads(pool: &PgPool, user_id: Option<i32>) -> Result<Vec<LeadRow>, sqlx::Error> {
    sqlx::query_as::<_, LeadRow>(
        "SELECT * FROM leads WHERE ($1::int IS NULL OR user_id = $1) ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_lead(pool: &PgPool, id: i32) -> Result<Option<LeadRow>, sqlx::Error> {
    sqlx::query_as::<_, LeadRow>("SELECT * FROM leads WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
