//! Inbound lead intake from Zapier.
//!
//! The raw message is turned into a lead by the LLM, stored, broadcast to
//! dashboards and queued for a welcome email.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;

use crate::leads::{NewLead, DEFAULT_INDUSTRY, DEFAULT_LOCATION, DEFAULT_REVENUE};

const FALLBACK_PROFILE_NAME: &str = "Unknown Lead";

/// Lead fields the LLM pulls out of free text. Every field is optional in the reply.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExtractedLead {
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ExtractedLead {
    /// Builds the row to insert, keeping the raw message and sender address.
    pub fn into_new_lead(self, raw_content: &str, source_email: Option<String>) -> NewLead {
        NewLead {
            user_id: None,
            profile_name: non_empty(self.profile_name)
                .unwrap_or_else(|| FALLBACK_PROFILE_NAME.to_string()),
            industry: Some(non_empty(self.industry).unwrap_or_else(|| DEFAULT_INDUSTRY.to_string())),
            revenue: Some(non_empty(self.revenue).unwrap_or_else(|| DEFAULT_REVENUE.to_string())),
            location: Some(non_empty(self.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string())),
            email: non_empty(source_email),
            raw_content: Some(raw_content.to_string()),
            status: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;

    #[test]
    fn test_extracted_lead_from_fenced_reply() {
        let reply = "```json\n{\"profile_name\":\"Acme Robotics\",\"industry\":\"Manufacturing\",\
                     \"revenue\":null,\"location\":\"Ohio\"}\n```";
        let extracted: ExtractedLead = parse_json_reply(reply).unwrap();

        assert_eq!(extracted.profile_name.as_deref(), Some("Acme Robotics"));
        assert_eq!(extracted.revenue, None);
    }

    #[test]
    fn test_into_new_lead_fills_gaps() {
        let extracted = ExtractedLead {
            profile_name: Some("  ".to_string()),
            industry: Some("Fintech".to_string()),
            ..Default::default()
        };
        let lead = extracted.into_new_lead("We sell ledgers", Some(" ops@acme.io ".to_string()));

        assert_eq!(lead.profile_name, FALLBACK_PROFILE_NAME);
        assert_eq!(lead.industry.as_deref(), Some("Fintech"));
        assert_eq!(lead.revenue.as_deref(), Some(DEFAULT_REVENUE));
        assert_eq!(lead.location.as_deref(), Some(DEFAULT_LOCATION));
        assert_eq!(lead.email.as_deref(), Some("ops@acme.io"));
        assert_eq!(lead.raw_content.as_deref(), Some("We sell ledgers"));
        assert_eq!(lead.user_id, None);
    }

    #[test]
    fn test_into_new_lead_drops_blank_email() {
        let lead = ExtractedLead::default().into_new_lead("hi", Some(String::new()));
        assert_eq!(lead.email, None);
    }
}
