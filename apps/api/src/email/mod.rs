//! Transactional email via the Brevo HTTP API.
//!
//! `BrevoClient` is the only module that talks to Brevo. Campaign sends are one
//! POST per recipient; a failed recipient is recorded and the batch continues.

pub mod campaigns;
pub mod handlers;
pub mod template;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";
const BREVO_STATS_URL: &str = "https://api.brevo.com/v3/smtp/statistics/aggregatedReport";
const DEFAULT_COMPANY: &str = "your company";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Brevo API error (status {status}): {body}")]
    Api { status: u16, body: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A campaign recipient with its merge fields, as sent by the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecipient {
    pub email: Option<String>,
    pub business_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// One rendered message, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalizedEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendFailure {
    pub email: String,
    pub error: Value,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SendReport {
    pub sent: u32,
    pub skipped: u32,
    pub errors: Vec<SendFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsRange {
    pub from: String,
    pub to: String,
}

/// Aggregated SMTP statistics, shaped like the Brevo dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub range: Value,
    pub events: i64,
    pub delivered: i64,
    pub opens: i64,
    pub clicks: i64,
    pub bounced: i64,
    pub soft_bounces: i64,
    pub hard_bounces: i64,
    pub raw: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AggregatedReport {
    range: Option<Value>,
    requests: Option<i64>,
    delivered: Option<i64>,
    opens: Option<i64>,
    unique_opens: Option<i64>,
    clicks: Option<i64>,
    unique_clicks: Option<i64>,
    soft_bounces: Option<i64>,
    hard_bounces: Option<i64>,
}

#[derive(Debug, Serialize)]
struct BrevoContact<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendRequest<'a> {
    sender: BrevoContact<'a>,
    to: Vec<BrevoContact<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct BrevoClient {
    client: Client,
    api_key: String,
    sender_email: String,
    sender_name: String,
}

impl BrevoClient {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            sender_email,
            sender_name,
        }
    }

    /// Sends one personalized message per recipient.
    /// Recipients without an email address are skipped, not failed.
    pub async fn send_personalized_emails(
        &self,
        subject: &str,
        body_template: &str,
        leads: &[LeadRecipient],
    ) -> Result<SendReport, EmailError> {
        validate_campaign(subject, body_template)?;

        let mut report = SendReport::default();

        for lead in leads {
            let Some(email) = personalize(subject, body_template, lead) else {
                report.skipped += 1;
                continue;
            };

            match self.send(&email).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!("Brevo send error for {}: {e}", email.to_email);
                    report.errors.push(SendFailure {
                        email: email.to_email,
                        error: failure_detail(&e),
                    });
                }
            }
        }

        info!(
            "Campaign '{subject}' finished: sent={}, skipped={}, failed={}",
            report.sent,
            report.skipped,
            report.errors.len()
        );
        Ok(report)
    }

    /// Sends a single rendered message.
    pub async fn send(&self, email: &PersonalizedEmail) -> Result<(), EmailError> {
        let payload = BrevoSendRequest {
            sender: BrevoContact {
                email: &self.sender_email,
                name: &self.sender_name,
            },
            to: vec![BrevoContact {
                email: &email.to_email,
                name: &email.to_name,
            }],
            subject: &email.subject,
            html_content: &email.html_content,
        };

        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmailError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Aggregated SMTP statistics for the last `days` days.
    pub async fn aggregated_stats(&self, days: i64) -> Result<EmailStats, EmailError> {
        let range = stats_window(Utc::now(), days);

        let response = self
            .client
            .get(BREVO_STATS_URL)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .query(&[("startDate", &range.from), ("endDate", &range.to)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmailError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let raw: Value = response.json().await?;
        Ok(summarize_stats(raw, &range))
    }
}

fn validate_campaign(subject: &str, body_template: &str) -> Result<(), EmailError> {
    if subject.trim().is_empty() || body_template.trim().is_empty() {
        return Err(EmailError::InvalidRequest(
            "subject and bodyTemplate are required".to_string(),
        ));
    }
    Ok(())
}

/// Renders subject and body for one lead. `None` when the lead has no email.
pub fn personalize(
    subject: &str,
    body_template: &str,
    lead: &LeadRecipient,
) -> Option<PersonalizedEmail> {
    let to_email = lead.email.as_deref().unwrap_or_default().trim();
    if to_email.is_empty() {
        return None;
    }

    let company = lead
        .business_name
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COMPANY);
    let first_name = lead.first_name.as_deref().unwrap_or_default();
    let last_name = lead.last_name.as_deref().unwrap_or_default();

    let body = template::render(
        body_template,
        &[
            ("company", company),
            ("firstName", first_name),
            ("lastName", last_name),
        ],
    );
    let subject = template::render(subject, &[("company", company)]);

    let full_name = format!("{first_name} {last_name}").trim().to_string();
    let to_name = if full_name.is_empty() {
        company.to_string()
    } else {
        full_name
    };

    Some(PersonalizedEmail {
        to_email: to_email.to_string(),
        to_name,
        subject,
        html_content: template::to_html(&body),
    })
}

fn failure_detail(e: &EmailError) -> Value {
    match e {
        EmailError::Api { status, body } => {
            serde_json::from_str(body).unwrap_or_else(|_| json_message(&format!("{status}: {body}")))
        }
        other => json_message(&other.to_string()),
    }
}

fn json_message(message: &str) -> Value {
    Value::String(message.to_string())
}

fn stats_window(now: DateTime<Utc>, days: i64) -> StatsRange {
    let start = now - Duration::days(days);
    StatsRange {
        from: start.format("%Y-%m-%d").to_string(),
        to: now.format("%Y-%m-%d").to_string(),
    }
}

fn summarize_stats(raw: Value, window: &StatsRange) -> EmailStats {
    let report: AggregatedReport = serde_json::from_value(raw.clone()).unwrap_or_default();

    let soft_bounces = report.soft_bounces.unwrap_or(0);
    let hard_bounces = report.hard_bounces.unwrap_or(0);

    EmailStats {
        range: report.range.unwrap_or_else(|| {
            serde_json::json!({ "from": window.from, "to": window.to })
        }),
        events: report.requests.unwrap_or(0),
        delivered: report.delivered.unwrap_or(0),
        opens: report.unique_opens.or(report.opens).unwrap_or(0),
        clicks: report.unique_clicks.or(report.clicks).unwrap_or(0),
        bounced: soft_bounces + hard_bounces,
        soft_bounces,
        hard_bounces,
        raw,
    }
}
