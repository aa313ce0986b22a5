//! Local persona insight templates. No LLM call; phrasing varies by sector.

use crate::analysis::insights::{InsightItem, PersonaInsights};

/// Coarse industry bucket guessed from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Software,
    Healthcare,
    Manufacturing,
    Finance,
    Retail,
    General,
}

impl Sector {
    pub fn detect(industry: &str) -> Self {
        let industry = industry.trim().to_lowercase();
        let has = |needle: &str| industry.contains(needle);

        if has("saas") || has("software") {
            Sector::Software
        } else if has("health") || has("med") {
            Sector::Healthcare
        } else if has("manufact") {
            Sector::Manufacturing
        } else if has("finance") || has("fintech") {
            Sector::Finance
        } else if has("retail") || has("e-commerce") {
            Sector::Retail
        } else {
            Sector::General
        }
    }
}

/// Buyer role a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaKind {
    Cto,
    MarketingManager,
    SalesDirector,
    Generic,
}

impl PersonaKind {
    pub fn detect(persona: &str) -> Self {
        let persona = persona.trim().to_lowercase();
        let is_cto = persona
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "cto")
            || persona.contains("chief technology");
        if is_cto {
            PersonaKind::Cto
        } else if persona.contains("marketing") {
            PersonaKind::MarketingManager
        } else if persona.contains("sales") {
            PersonaKind::SalesDirector
        } else {
            PersonaKind::Generic
        }
    }
}

pub fn build(persona: PersonaKind, sector: Sector) -> PersonaInsights {
    match persona {
        PersonaKind::Cto => cto(sector),
        PersonaKind::MarketingManager => marketing_manager(sector),
        PersonaKind::SalesDirector => sales_director(sector),
        PersonaKind::Generic => generic(),
    }
}

fn item(title: &str, description: impl Into<String>, relevance: i32) -> InsightItem {
    InsightItem {
        title: title.to_string(),
        description: description.into(),
        relevance: Some(relevance),
    }
}

fn cto(sector: Sector) -> PersonaInsights {
    let note = match sector {
        Sector::Healthcare => " while meeting strict security and compliance requirements",
        Sector::Finance => " while managing risk and regulatory requirements",
        Sector::Manufacturing => " while supporting legacy systems on the shop floor",
        Sector::Retail => " while handling seasonal demand spikes and omnichannel data",
        Sector::Software | Sector::General => "",
    };

    PersonaInsights {
        pain_points: vec![
            item(
                "Fragmented Technology Stack",
                format!(
                    "Core systems are spread across multiple vendors and custom tools, creating data \
                     silos and fragile integrations. The team spends too much time firefighting \
                     integration issues instead of building new capabilities{note}."
                ),
                9,
            ),
            item(
                "Difficulty Scaling Infrastructure",
                "Traffic and data volumes are growing faster than expected. Capacity planning is \
                 manual, and scaling decisions are often reactive, leading to performance incidents \
                 and unplanned downtime.",
                9,
            ),
            item(
                "Limited Visibility into System Health",
                "Monitoring and logging are inconsistent across services. The team lacks a single \
                 view of application health, making it hard to trace issues end-to-end and \
                 understand their business impact.",
                8,
            ),
            item(
                "Talent and Knowledge Bottlenecks",
                "Critical systems are understood by only a few senior engineers. Knowledge is \
                 tribal, making onboarding slow and raising operational risk if key people leave.",
                7,
            ),
        ],
        outcomes: vec![
            item(
                "Unified, Well-Integrated Platform",
                "Critical systems share a consistent integration pattern with clear contracts and \
                 observability. Changes can be deployed safely without breaking upstream or \
                 downstream teams.",
                9,
            ),
            item(
                "Predictable, Elastic Infrastructure",
                "Capacity scales automatically with demand, with clear SLOs and cost guardrails. \
                 Engineering leaders have confidence in performance during peak periods and \
                 product launches.",
                9,
            ),
            item(
                "Single Pane of Glass for Observability",
                "Engineering and product teams share a unified view of system health, customer \
                 experience, and key business transactions, enabling faster troubleshooting and \
                 better prioritization.",
                8,
            ),
            item(
                "Resilient, Well-Documented Architecture",
                "Critical services are documented, instrumented, and follow common standards so \
                 new engineers can contribute quickly and operational risk is reduced.",
                8,
            ),
        ],
    }
}

fn marketing_manager(sector: Sector) -> PersonaInsights {
    let note = match sector {
        Sector::Software => " for trial users, product engagement, and expansion opportunities",
        Sector::Retail => " for high-value shoppers and repeat purchase behavior",
        Sector::Finance => " for key customer segments and risk-adjusted profitability",
        _ => "",
    };

    PersonaInsights {
        pain_points: vec![
            item(
                "Fragmented Customer View Across Channels",
                format!(
                    "Campaign, website, product, and CRM data live in separate tools. It is \
                     difficult to see the full buyer journey, so targeting and messaging remain \
                     generic and under-performing{note}."
                ),
                9,
            ),
            item(
                "Difficulty Proving Marketing ROI",
                "Attribution models are inconsistent, and revenue data is delayed or incomplete. \
                 Marketing leaders struggle to clearly connect spend to pipeline and closed-won \
                 deals.",
                9,
            ),
            item(
                "Manual Campaign Operations",
                "Audience building, list management, and reporting involve exports, spreadsheets, \
                 and one-off workflows, slowing down experimentation and time-to-market.",
                8,
            ),
        ],
        outcomes: vec![
            item(
                "Unified Revenue and Journey Analytics",
                "Marketing can see the full path from first touch to closed-won in a single \
                 workspace, sliced by segment, persona, and campaign. This enables confident \
                 budget allocation and smarter messaging.",
                9,
            ),
            item(
                "Always-On, Persona-Based Campaigns",
                "Audiences are automatically refreshed based on behaviors and firmographics. \
                 Campaigns adapt in real time, personalizing content and offers to each segment.",
                8,
            ),
            item(
                "Operational Efficiency in the Marketing Team",
                "Routine list building, lead routing, and reporting are automated so the team can \
                 focus on strategy, testing, and collaboration with sales rather than manual data \
                 work.",
                8,
            ),
        ],
    }
}

fn sales_director(sector: Sector) -> PersonaInsights {
    let note = match sector {
        Sector::Software => " in complex, multi-stakeholder SaaS deals",
        Sector::Manufacturing => " in long-cycle capital equipment and services deals",
        Sector::Finance => " in multi-product financial solutions and renewals",
        _ => "",
    };

    PersonaInsights {
        pain_points: vec![
            item(
                "Inconsistent Pipeline Quality",
                format!(
                    "Sales leaders see large swings in pipeline quality and deal velocity. Reps are \
                     often working poorly qualified opportunities that do not fit the ICP, leading \
                     to low win rates{note}."
                ),
                9,
            ),
            item(
                "Limited Visibility into Deal Health",
                "Notes, emails, and stakeholder data are scattered across systems. It is difficult \
                 to quickly understand which deals are truly at risk and where executive support \
                 is needed.",
                8,
            ),
            item(
                "Onboarding New Reps Takes Too Long",
                "Playbooks, talk tracks, and objection handling are not consistently documented. \
                 New reps struggle to ramp quickly and repeat what top performers are doing.",
                8,
            ),
        ],
        outcomes: vec![
            item(
                "Consistent, ICP-Aligned Pipeline",
                "Most opportunities entering the pipeline match a clear ICP definition. Reps spend \
                 more time with accounts that have the right profile and intent, improving \
                 conversion rates.",
                9,
            ),
            item(
                "Deal Rooms with Clear Stakeholder Maps",
                "Key contacts, engagement history, and risks are visible in one place so leaders \
                 can quickly understand which deals to support and how.",
                8,
            ),
            item(
                "Codified, Data-Driven Sales Playbooks",
                "Winning behaviors and messaging are captured and shared so new reps can ramp \
                 faster and the team can run consistent plays across regions and segments.",
                8,
            ),
        ],
    }
}

fn generic() -> PersonaInsights {
    PersonaInsights {
        pain_points: vec![
            item(
                "Disconnected Tools and Manual Reporting",
                "Teams rely on spreadsheets and exports from multiple systems to answer basic \
                 questions about performance. This slows decision-making and hides systemic issues.",
                9,
            ),
            item(
                "Limited Insight into Customer Behavior",
                "Data about customers, orders, and revenue is spread across several tools, making \
                 it hard to see clear patterns and prioritize the right initiatives.",
                8,
            ),
        ],
        outcomes: vec![
            item(
                "Unified View of Operations and Customers",
                "Leaders can see up-to-date metrics about pipeline, revenue, and customer health in \
                 one place, segmented by ICP and persona.",
                9,
            ),
            item(
                "Reduced Manual Work and Faster Decisions",
                "Data collection, cleansing, and basic reporting are automated so teams can focus \
                 on strategy and execution rather than spreadsheets.",
                8,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_detection_order() {
        assert_eq!(Sector::detect("B2B SaaS"), Sector::Software);
        assert_eq!(Sector::detect("Software healthcare"), Sector::Software);
        assert_eq!(Sector::detect("MedTech"), Sector::Healthcare);
        assert_eq!(Sector::detect("Contract Manufacturing"), Sector::Manufacturing);
        assert_eq!(Sector::detect("fintech"), Sector::Finance);
        assert_eq!(Sector::detect("E-Commerce"), Sector::Retail);
        assert_eq!(Sector::detect("Mining"), Sector::General);
    }

    #[test]
    fn test_persona_detection() {
        assert_eq!(PersonaKind::detect("CTO"), PersonaKind::Cto);
        assert_eq!(PersonaKind::detect("Marketing Manager"), PersonaKind::MarketingManager);
        assert_eq!(PersonaKind::detect("VP Sales"), PersonaKind::SalesDirector);
        assert_eq!(PersonaKind::detect("Head of People"), PersonaKind::Generic);
    }

    #[test]
    fn test_director_titles_are_not_mistaken_for_cto() {
        assert_eq!(PersonaKind::detect("Sales Director"), PersonaKind::SalesDirector);
        assert_eq!(PersonaKind::detect("Director of Marketing"), PersonaKind::MarketingManager);
        assert_eq!(PersonaKind::detect("Fractional CTO / Advisor"), PersonaKind::Cto);
        assert_eq!(PersonaKind::detect("Chief Technology Officer"), PersonaKind::Cto);
    }

    #[test]
    fn test_sector_note_lands_in_first_pain_point() {
        let insights = build(PersonaKind::Cto, Sector::Finance);
        assert!(insights.pain_points[0]
            .description
            .ends_with("while managing risk and regulatory requirements."));

        let plain = build(PersonaKind::Cto, Sector::General);
        assert!(plain.pain_points[0]
            .description
            .ends_with("building new capabilities."));
    }

    #[test]
    fn test_every_template_is_complete() {
        let personas = [
            PersonaKind::Cto,
            PersonaKind::MarketingManager,
            PersonaKind::SalesDirector,
            PersonaKind::Generic,
        ];
        for persona in personas {
            let insights = build(persona, Sector::Retail);
            assert!(!insights.pain_points.is_empty(), "{persona:?}");
            assert!(!insights.outcomes.is_empty(), "{persona:?}");
            for item in insights.pain_points.iter().chain(&insights.outcomes) {
                assert!(!item.title.is_empty());
                assert!(!item.description.contains("  "), "{}", item.title);
            }
        }
    }
}
