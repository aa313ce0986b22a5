use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A lead / ICP profile. Manual leads carry `user_id`; webhook leads carry
/// `email` and `raw_content`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadRow {
    pub id: i32,
    pub user_id: Option<i32>,
    pub profile_name: String,
    pub industry: Option<String>,
    pub revenue: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub raw_content: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;

    use super::LeadRow;

    /// A webhook-style lead with an email address.
    pub(crate) fn sample_lead() -> LeadRow {
        LeadRow {
            id: 7,
            user_id: None,
            profile_name: "Acme".to_string(),
            industry: Some("software".to_string()),
            revenue: Some("10M".to_string()),
            location: Some("Austin TX".to_string()),
            email: Some("ops@acme.test".to_string()),
            raw_content: None,
            status: None,
            created_at: Utc::now(),
        }
    }
}
