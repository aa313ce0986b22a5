//! ICP Analysis: top dataset companies for an ICP plus persona insights.
//!
//! Companies come from the candidate selector (no LLM). Insights come from the
//! configured `PersonaInsightGenerator` and replace the ICP's previously
//! generated insights in one transaction; custom insights are kept.

pub mod handlers;
pub mod insights;
pub mod prompts;
pub mod templates;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

use crate::analysis::insights::{PersonaInsightGenerator, PersonaInsights};
use crate::errors::AppError;
use crate::matching::selector::{CandidateCompany, CandidateSelector};
use crate::matching::IcpDefinition;
use crate::models::insight::{InsightType, PersonaInsightRow};

pub const DEFAULT_PERSONAS: [&str; 3] = ["CTO", "Marketing Manager", "Sales Director"];

const CANDIDATE_POOL: usize = 300;
const SELECTED_COMPANIES: usize = 100;
const DEFAULT_RELEVANCE: i32 = 8;
const FALLBACK_INDUSTRY: &str = "General";
const UNASSIGNED_STATUS: &str = "unassigned";

/// One insight row ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInsight {
    pub persona: String,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub relevance: i32,
}

/// Selects the top companies for `icp` and refreshes its persona insights.
/// Returns the selected companies.
pub async fn analyze_icp_with_dataset(
    pool: &PgPool,
    selector: &CandidateSelector,
    generator: &dyn PersonaInsightGenerator,
    icp_id: i32,
    icp: &IcpDefinition,
) -> Result<Vec<CandidateCompany>, AppError> {
    let candidates = selector.select_top_candidates(icp, CANDIDATE_POOL).await?;
    let companies: Vec<CandidateCompany> = candidates
        .iter()
        .take(SELECTED_COMPANIES)
        .map(|c| CandidateCompany::from(&c.record))
        .collect();

    let industry = icp
        .industry
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(FALLBACK_INDUSTRY);

    let mut rows = Vec::new();
    for persona in DEFAULT_PERSONAS {
        let insights = generator.generate(industry, persona).await?;
        rows.extend(collect_insight_rows(persona, insights));
    }

    save_persona_insights(pool, icp_id, industry, &rows)
        .await
        .map_err(|e| {
            error!("Error saving persona insights for ICP {icp_id}: {e}");
            e
        })?;

    info!(
        "Analyzed ICP {icp_id}: {} companies, {} insights (backend: {})",
        companies.len(),
        rows.len(),
        generator.backend()
    );
    Ok(companies)
}

/// Flattens one persona's insights into rows, dropping items without a title or description.
pub fn collect_insight_rows(persona: &str, insights: PersonaInsights) -> Vec<NewInsight> {
    let tagged = insights
        .pain_points
        .into_iter()
        .map(|i| (InsightType::PainPoint, i))
        .chain(insights.outcomes.into_iter().map(|i| (InsightType::Outcome, i)));

    tagged
        .filter(|(_, i)| !i.title.trim().is_empty() && !i.description.trim().is_empty())
        .map(|(insight_type, i)| NewInsight {
            persona: persona.to_string(),
            insight_type,
            title: i.title,
            description: i.description,
            relevance: i.relevance.filter(|r| *r > 0).unwrap_or(DEFAULT_RELEVANCE),
        })
        .collect()
}

/// Replaces the ICP's generated insights. Runs in one transaction; any failure rolls back.
async fn save_persona_insights(
    pool: &PgPool,
    icp_id: i32,
    industry: &str,
    rows: &[NewInsight],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM persona_insights WHERE icp_id = $1 AND is_custom = false")
        .bind(icp_id)
        .execute(&mut *tx)
        .await?;

    if !rows.is_empty() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO persona_insights \
             (icp_id, industry, persona, title, description, relevance_score, type, is_custom, status) ",
        );
        builder.push_values(rows, |mut b, row| {
            b.push_bind(icp_id)
                .push_bind(industry)
                .push_bind(&row.persona)
                .push_bind(&row.title)
                .push_bind(&row.description)
                .push_bind(row.relevance)
                .push_bind(row.insight_type.as_str())
                .push_bind(false)
                .push_bind(UNASSIGNED_STATUS);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await
}

/// Stored insights for a persona, most relevant first, optionally for one ICP.
pub async fn list_persona_insights(
    pool: &PgPool,
    persona: &str,
    icp_id: Option<i32>,
) -> Result<Vec<PersonaInsightRow>, sqlx::Error> {
    sqlx::query_as::<_, PersonaInsightRow>(
        r#"
        SELECT * FROM persona_insights
        WHERE persona = $1 AND ($2::int IS NULL OR icp_id = $2)
        ORDER BY relevance_score DESC, created_at DESC
        "#,
    )
    .bind(persona)
    .bind(icp_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::insights::InsightItem;

    fn item(title: &str, description: &str, relevance: Option<i32>) -> InsightItem {
        InsightItem {
            title: title.to_string(),
            description: description.to_string(),
            relevance,
        }
    }

    #[test]
    fn test_collect_rows_tags_type_and_defaults_relevance() {
        let insights = PersonaInsights {
            pain_points: vec![item("Silos", "Data everywhere.", Some(9))],
            outcomes: vec![item("One view", "Data in one place.", None)],
        };
        let rows = collect_insight_rows("CTO", insights);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].insight_type, InsightType::PainPoint);
        assert_eq!(rows[0].relevance, 9);
        assert_eq!(rows[1].insight_type, InsightType::Outcome);
        assert_eq!(rows[1].relevance, DEFAULT_RELEVANCE);
        assert!(rows.iter().all(|r| r.persona == "CTO"));
    }

    #[test]
    fn test_collect_rows_replaces_non_positive_relevance() {
        let insights = PersonaInsights {
            pain_points: vec![item("Zero", "Scored zero.", Some(0))],
            outcomes: vec![item("Negative", "Scored below zero.", Some(-3))],
        };
        let rows = collect_insight_rows("CTO", insights);

        assert!(rows.iter().all(|r| r.relevance == DEFAULT_RELEVANCE));
    }

    #[test]
    fn test_collect_rows_drops_incomplete_items() {
        let insights = PersonaInsights {
            pain_points: vec![item("", "No title.", None), item("No description", " ", None)],
            outcomes: vec![item("Kept", "Complete.", Some(7))],
        };
        let rows = collect_insight_rows("Sales Director", insights);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Kept");
    }
}
