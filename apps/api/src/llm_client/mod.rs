/// LLM Client: the single point of entry for all chat-completion calls in LeadGen.
///
/// ARCHITECTURAL RULE: No other module may call the Groq API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: llama-3.1-8b-instant (hardcoded, sized to stay under the account TPM limit)
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all LLM calls in LeadGen.
pub const MODEL: &str = "llama-3.1-8b-instant";
const MAX_TOKENS: u32 = 700;
const TEMPERATURE: f32 = 0.7;
const MAX_RETRIES: u32 = 3;
const BACKOFF_BASE_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No JSON object found in model response")]
    NoJson,

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Outcome of a failed request: worth retrying or not.
enum Attempt {
    Retryable(LlmError),
    Fatal(LlmError),
}

fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1))
}

impl LlmResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

/// The single LLM client used by all services in LeadGen.
/// Wraps the Groq chat-completions API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// One chat completion with `system` and `prompt`. Rate limits (429) and
    /// server errors are retried up to `MAX_RETRIES` attempts in total, backing
    /// off 1s then 2s between them.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut attempt = 1;
        loop {
            match self.complete_once(&request).await {
                Ok(response) => {
                    if let Some(usage) = &response.usage {
                        debug!(
                            "Groq completion ok on attempt {attempt}: {} prompt / {} completion tokens",
                            usage.prompt_tokens, usage.completion_tokens
                        );
                    }
                    return Ok(response);
                }
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::Retryable(e)) if attempt < MAX_RETRIES => {
                    let delay = retry_delay(attempt);
                    warn!(
                        "Groq attempt {attempt}/{MAX_RETRIES} failed ({e}); retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(Attempt::Retryable(LlmError::Api { status: 429, .. })) => {
                    return Err(LlmError::RateLimited {
                        retries: MAX_RETRIES,
                    })
                }
                Err(Attempt::Retryable(e)) => return Err(e),
            }
        }
    }

    async fn complete_once(&self, request: &ChatRequest<'_>) -> Result<LlmResponse, Attempt> {
        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Attempt::Retryable(LlmError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<LlmResponse>()
                .await
                .map_err(|e| Attempt::Fatal(LlmError::Http(e)));
        }

        let body = response.text().await.unwrap_or_default();
        let error = LlmError::Api {
            status: status.as_u16(),
            message: serde_json::from_str::<GroqError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body),
        };
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(Attempt::Retryable(error))
        } else {
            Err(Attempt::Fatal(error))
        }
    }

    /// Calls the LLM and deserializes the JSON object embedded in its reply.
    /// The prompt must instruct the model to return a JSON object.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_json_reply(text)
    }
}

/// Deserializes the outermost `{...}` object in a model reply, tolerating
/// code fences and chatter around it.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let object = extract_json_object(strip_json_fences(text)).ok_or(LlmError::NoJson)?;
    serde_json::from_str(object).map_err(LlmError::Parse)
}

/// Removes a surrounding markdown code fence (with or without a language tag).
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Slice from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_fences_handles_language_tags() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```JSON\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_leaves_plain_text_alone() {
        assert_eq!(strip_json_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_retry_delay_doubles() {
        assert_eq!(retry_delay(1), Duration::from_secs(1));
        assert_eq!(retry_delay(2), Duration::from_secs(2));
    }

    #[test]
    fn test_extract_json_object_ignores_surrounding_chatter() {
        let input = "Sure! Here it is:\n{\"a\": {\"b\": 1}}\nHope that helps.";
        assert_eq!(extract_json_object(input), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extract_json_object_none_without_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_json_reply_fenced_with_preamble() {
        let value: Value = parse_json_reply("```json\n{\"industry\": \"retail\"}\n```").unwrap();
        assert_eq!(value["industry"], "retail");
    }

    #[test]
    fn test_parse_json_reply_reports_missing_object() {
        let err = parse_json_reply::<Value>("I cannot help with that").unwrap_err();
        assert!(matches!(err, LlmError::NoJson));
    }

    #[test]
    fn test_response_text_skips_blank_content() {
        let response: LlmResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert_eq!(response.text(), None);
    }
}
