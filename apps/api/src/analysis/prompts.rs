use crate::llm_client::prompts::GTM_STRATEGIST_SYSTEM;

pub const PERSONA_INSIGHTS_SYSTEM: &str = GTM_STRATEGIST_SYSTEM;

/// Placeholders: `{industry}`, `{persona}`.
pub const PERSONA_INSIGHTS_PROMPT: &str = r#"Industry: {industry}
Buyer persona: {persona}

List the 3-4 most pressing pain points this persona faces in this industry, and the
business outcomes they want instead. Be concrete and specific to the industry.

Respond with a JSON object of exactly this shape:
{
  "pain_points": [{ "title": "short title", "description": "2-3 sentences", "relevance": 1-10 }],
  "outcomes":    [{ "title": "short title", "description": "2-3 sentences", "relevance": 1-10 }]
}"#;
