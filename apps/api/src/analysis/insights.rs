//! Persona insight generation: pluggable, trait-based.
//!
//! Default: `TemplateInsightGenerator` (local templates, deterministic, no network).
//! Optional: `LlmInsightGenerator` (via `llm_client`), enabled with `ENABLE_LLM_INSIGHTS`.
//!
//! `AppState` holds an `Arc<dyn PersonaInsightGenerator>`, chosen at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{PERSONA_INSIGHTS_PROMPT, PERSONA_INSIGHTS_SYSTEM};
use crate::analysis::templates::{self, PersonaKind, Sector};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub relevance: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaInsights {
    #[serde(default)]
    pub pain_points: Vec<InsightItem>,
    #[serde(default)]
    pub outcomes: Vec<InsightItem>,
}

#[async_trait]
pub trait PersonaInsightGenerator: Send + Sync {
    async fn generate(&self, industry: &str, persona: &str) -> Result<PersonaInsights, AppError>;

    fn backend(&self) -> &'static str;
}

/// Template-based generator. Picks a template by persona and tunes it by sector.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateInsightGenerator;

#[async_trait]
impl PersonaInsightGenerator for TemplateInsightGenerator {
    async fn generate(&self, industry: &str, persona: &str) -> Result<PersonaInsights, AppError> {
        Ok(templates::build(
            PersonaKind::detect(persona),
            Sector::detect(industry),
        ))
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

/// LLM-backed generator.
pub struct LlmInsightGenerator(pub LlmClient);

#[async_trait]
impl PersonaInsightGenerator for LlmInsightGenerator {
    async fn generate(&self, industry: &str, persona: &str) -> Result<PersonaInsights, AppError> {
        let prompt = PERSONA_INSIGHTS_PROMPT
            .replace("{industry}", industry)
            .replace("{persona}", persona);

        self.0
            .call_json::<PersonaInsights>(&prompt, PERSONA_INSIGHTS_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to generate insights for {persona}: {e}")))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
