use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub groq_api_key: String,
    pub brevo_api_key: String,
    pub brevo_sender_email: String,
    pub brevo_sender_name: String,
    pub dataset_path: PathBuf,
    pub cors_origin: String,
    /// Use the LLM-backed persona insight generator instead of local templates.
    pub enable_llm_insights: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            brevo_api_key: require_env("BREVO_API_KEY")?,
            brevo_sender_email: require_env("BREVO_SENDER_EMAIL")?,
            brevo_sender_name: optional_env("BREVO_SENDER_NAME", "LeadGen AI"),
            dataset_path: PathBuf::from(optional_env(
                "DATASET_PATH",
                "data/business_dataset.csv",
            )),
            cors_origin: optional_env("CORS_ORIGIN", "http://localhost:3000"),
            enable_llm_insights: parse_flag(&optional_env("ENABLE_LLM_INSIGHTS", "false")),
            port: optional_env("PORT", "4000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v} should be truthy");
        }
    }

    #[test]
    fn test_parse_flag_rejects_everything_else() {
        for v in ["", "0", "false", "off", "enabled"] {
            assert!(!parse_flag(v), "{v} should be falsy");
        }
    }
}
