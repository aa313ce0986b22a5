// ICP matching engine: heuristic scoring of dataset records and top-K selection.
// Pure in-memory computation over the cached dataset; no LLM or database calls.

pub mod handlers;
pub mod scorer;
pub mod selector;

use serde::{Deserialize, Serialize};

use crate::models::lead::LeadRow;

/// User-authored targeting criteria. All fields are free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcpDefinition {
    pub industry: Option<String>,
    /// May mix city, state and zip tokens, e.g. "Austin TX 78701".
    pub location: Option<String>,
    pub revenue: Option<String>,
}

impl From<&LeadRow> for IcpDefinition {
    fn from(lead: &LeadRow) -> Self {
        Self {
            industry: lead.industry.clone(),
            location: lead.location.clone(),
            revenue: lead.revenue.clone(),
        }
    }
}
