//! Candidate Scorer: heuristic fit between one business record and one ICP.
//!
//! Default: `HeuristicScorer` (substring matching, deterministic, no I/O).
//! `AppState` holds an `Arc<dyn CandidateScorer>` so the selector never names a backend.
//!
//! Dimensions (constants are hand-tuned and must stay stable):
//! - industry: full ICP phrase in the SIC name → 6, else any ICP word → 3
//! - location: record city / state / zip found in the ICP location → 4 / 2 / 1, stacking
//! - revenue:  "million" band with an "m" revenue → 2; "billion" band with a "b" revenue → 2
//!
//! A record with no signal at all scores 1, never 0.

use crate::dataset::BusinessRecord;
use crate::matching::IcpDefinition;

const INDUSTRY_PHRASE_POINTS: u32 = 6;
const INDUSTRY_TOKEN_POINTS: u32 = 3;
const CITY_POINTS: u32 = 4;
const STATE_POINTS: u32 = 2;
const ZIP_POINTS: u32 = 1;
const REVENUE_BAND_POINTS: u32 = 2;
const SCORE_FLOOR: u32 = 1;

/// The scorer trait. Implementations must be pure: same inputs, same score.
pub trait CandidateScorer: Send + Sync {
    fn score(&self, record: &BusinessRecord, icp: &IcpTarget) -> u32;

    /// Backend label, surfaced in logs.
    fn backend(&self) -> &'static str;
}

/// An ICP with every field trimmed and lower-cased. Build once per scoring pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcpTarget {
    pub industry: String,
    pub location: String,
    pub revenue: String,
}

impl From<&IcpDefinition> for IcpTarget {
    fn from(icp: &IcpDefinition) -> Self {
        Self {
            industry: clean(icp.industry.as_deref().unwrap_or_default()),
            location: clean(icp.location.as_deref().unwrap_or_default()),
            revenue: clean(icp.revenue.as_deref().unwrap_or_default()),
        }
    }
}

/// Substring heuristic scorer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

impl CandidateScorer for HeuristicScorer {
    fn score(&self, record: &BusinessRecord, icp: &IcpTarget) -> u32 {
        let sic_name = clean(&record.sic_name);
        let sales_volume = clean(&record.sales_volume);
        let city = clean(&record.city);
        let state = clean(&record.state);
        let zip = clean(&record.zip);

        let score = industry_points(&icp.industry, &sic_name)
            + location_points(&icp.location, &city, &state, &zip)
            + revenue_points(&icp.revenue, &sales_volume);

        score.max(SCORE_FLOOR)
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

/// Scores a record against a raw ICP definition.
pub fn score_business(record: &BusinessRecord, icp: &IcpDefinition) -> u32 {
    HeuristicScorer.score(record, &IcpTarget::from(icp))
}

fn clean(value: &str) -> String {
    value.trim().to_lowercase()
}

fn industry_points(industry: &str, sic_name: &str) -> u32 {
    if industry.is_empty() {
        return 0;
    }
    if sic_name.contains(industry) {
        INDUSTRY_PHRASE_POINTS
    } else if industry
        .split_whitespace()
        .any(|word| sic_name.contains(word))
    {
        INDUSTRY_TOKEN_POINTS
    } else {
        0
    }
}

fn location_points(location: &str, city: &str, state: &str, zip: &str) -> u32 {
    if location.is_empty() {
        return 0;
    }
    let mut points = 0;
    if !city.is_empty() && location.contains(city) {
        points += CITY_POINTS;
    }
    if !state.is_empty() && location.contains(state) {
        points += STATE_POINTS;
    }
    if !zip.is_empty() && location.contains(zip) {
        points += ZIP_POINTS;
    }
    points
}

fn revenue_points(revenue: &str, sales_volume: &str) -> u32 {
    if revenue.is_empty() || sales_volume.is_empty() {
        return 0;
    }
    let mut points = 0;
    if sales_volume.contains("million") && revenue.contains('m') {
        points += REVENUE_BAND_POINTS;
    }
    if sales_volume.contains("billion") && revenue.contains('b') {
        points += REVENUE_BAND_POINTS;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sic_name: &str, city: &str, state: &str, zip: &str, sales: &str) -> BusinessRecord {
        BusinessRecord {
            sic_name: sic_name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
            sales_volume: sales.to_string(),
            ..Default::default()
        }
    }

    fn icp(industry: &str, location: &str, revenue: &str) -> IcpDefinition {
        IcpDefinition {
            industry: Some(industry.to_string()),
            location: Some(location.to_string()),
            revenue: Some(revenue.to_string()),
        }
    }

    #[test]
    fn test_full_industry_phrase_scores_six() {
        let r = record("Software Development", "", "", "", "");
        assert_eq!(score_business(&r, &icp("software development", "", "")), 6);
    }

    #[test]
    fn test_industry_word_match_scores_three() {
        let r = record("software consulting", "", "", "", "");
        assert_eq!(score_business(&r, &icp("software services", "", "")), 3);
    }

    #[test]
    fn test_location_dimensions_stack() {
        let r = record("", "Austin", "TX", "78701", "");
        assert_eq!(score_business(&r, &icp("", "Austin, TX 78701", "")), 7);
        assert_eq!(score_business(&r, &icp("", "tx", "")), 2);
        assert_eq!(score_business(&r, &icp("", "78701", "")), 1);
    }

    #[test]
    fn test_empty_city_never_matches() {
        // An empty needle would otherwise match every location blob.
        let r = record("", "", "", "", "");
        assert_eq!(score_business(&r, &icp("", "austin tx", "")), 1);
    }

    #[test]
    fn test_revenue_bands() {
        let million = record("", "", "", "", "50 Million");
        let billion = record("", "", "", "", "2 Billion");
        assert_eq!(score_business(&million, &icp("", "", "10m+")), 2);
        assert_eq!(score_business(&billion, &icp("", "", "1b")), 2);
        assert_eq!(score_business(&billion, &icp("", "", "10m")), 1);
    }

    #[test]
    fn test_revenue_checks_are_independent() {
        // "million billion" is contrived but both checks must be able to fire.
        let r = record("", "", "", "", "million billion");
        assert_eq!(score_business(&r, &icp("", "", "mb")), 4);
    }

    #[test]
    fn test_no_signal_floors_at_one() {
        let r = record("retail", "Dallas", "TX", "75201", "Unknown");
        assert_eq!(score_business(&r, &icp("mining", "Portland OR", "1b")), 1);
        assert_eq!(score_business(&r, &IcpDefinition::default()), 1);
    }

    #[test]
    fn test_whitespace_and_case_are_normalized() {
        let r = record("  SOFTWARE consulting ", " Austin ", "TX", "", "");
        assert_eq!(score_business(&r, &icp(" Software ", " AUSTIN ", "")), 10);
    }

    #[test]
    fn test_matching_industry_never_lowers_score() {
        let r = record("software consulting", "Austin", "TX", "78701", "50 Million");
        let baseline = score_business(&r, &icp("mining", "austin tx", "m"));
        for industry in ["software", "consulting", "software consulting", "software tools"] {
            let with_match = score_business(&r, &icp(industry, "austin tx", "m"));
            assert!(with_match > baseline, "{industry}: {with_match} <= {baseline}");
        }
    }

    #[test]
    fn test_scenario_scores() {
        let a = record("software consulting", "Austin", "TX", "", "50 Million");
        let b = record("retail", "Dallas", "TX", "", "Unknown");
        let c = record("software development", "Austin", "TX", "", "200 Million");
        let target = icp("software", "austin tx", "m");

        // "software" is a full substring of both classifiers.
        assert_eq!(score_business(&a, &target), 14);
        assert_eq!(score_business(&b, &target), 2);
        assert_eq!(score_business(&c, &target), 14);

        let token_target = icp("software services", "austin tx", "m");
        assert_eq!(score_business(&a, &token_target), 11);
        assert_eq!(score_business(&c, &token_target), 11);
    }

    #[test]
    fn test_backend_label() {
        assert_eq!(HeuristicScorer.backend(), "heuristic");
    }
}
