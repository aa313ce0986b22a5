// Prompts for webhook lead extraction.

pub const LEAD_EXTRACTION_PROMPT: &str = r#"Extract the business profile described in the message below.

Return a JSON object with exactly these keys:
{
  "profile_name": "short name for the company or profile",
  "industry": "industry or sector",
  "revenue": "annual revenue as written, or null",
  "location": "city, state or country, or null"
}

Message:
{raw_content}"#;
