//! Candidate Selector: ranks every dataset record against an ICP and keeps the top K.
//!
//! Reuses `matching::scorer` for per-record scores. The sort is stable, so records
//! with equal scores keep their dataset order.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::dataset::loader::DatasetCache;
use crate::dataset::{BusinessRecord, DatasetLoadError};
use crate::matching::scorer::{CandidateScorer, IcpTarget};
use crate::matching::IcpDefinition;

/// Candidate count used when the caller does not ask for one.
pub const DEFAULT_CANDIDATE_COUNT: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One record from a scoring pass. `index` is the record's position in the
/// dataset, kept for tracing only.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub index: usize,
    pub record: BusinessRecord,
    pub score: u32,
}

/// Public shape of a matched company. Score and index are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCompany {
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mailing_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub sales_volume: Option<String>,
    pub employees: Option<String>,
    pub public_private: Option<String>,
    pub location_type: Option<String>,
    pub sic_name: Option<String>,
    pub sic: Option<String>,
    pub naics: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub web: Option<String>,
}

impl From<&BusinessRecord> for CandidateCompany {
    fn from(r: &BusinessRecord) -> Self {
        Self {
            business_name: present(&r.business_name),
            email: present(r.email.trim()),
            phone: present(r.phone.trim()),
            mailing_address: present(&r.mailing_address),
            city: present(&r.city),
            state: present(&r.state),
            zip: present(&r.zip),
            sales_volume: present(&r.sales_volume),
            employees: present(&r.employees),
            public_private: present(&r.public_private),
            location_type: present(&r.location_type),
            sic_name: present(&r.sic_name),
            sic: present(&r.sic),
            naics: present(&r.naics),
            first_name: present(&r.first_name),
            last_name: present(&r.last_name),
            title: present(&r.title),
            web: present(&r.web),
        }
    }
}

fn present(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

/// Selector over the cached dataset. Cheap to clone; all clones share one cache.
#[derive(Clone)]
pub struct CandidateSelector {
    dataset: Arc<DatasetCache>,
    scorer: Arc<dyn CandidateScorer>,
}

impl CandidateSelector {
    pub fn new(dataset: Arc<DatasetCache>, scorer: Arc<dyn CandidateScorer>) -> Self {
        Self { dataset, scorer }
    }

    /// Top `candidate_count` records for `icp`, best first.
    /// Fails only if the dataset cannot be loaded.
    pub async fn select_top_candidates(
        &self,
        icp: &IcpDefinition,
        candidate_count: usize,
    ) -> Result<Vec<ScoredCandidate>, DatasetLoadError> {
        let dataset = self.dataset.load().await?;
        let selected = rank_candidates(&dataset, self.scorer.as_ref(), icp, candidate_count);
        if let Some(top) = selected.first() {
            debug!(
                "Selected {} of {} candidates (scorer: {}, top: row {} scored {})",
                selected.len(),
                dataset.len(),
                self.scorer.backend(),
                top.index,
                top.score
            );
        }
        Ok(selected)
    }

    /// True once the dataset is in memory.
    pub fn dataset_loaded(&self) -> bool {
        self.dataset.is_loaded()
    }

    /// Top `limit` matches projected to the public company shape.
    pub async fn get_candidates(
        &self,
        icp: &IcpDefinition,
        limit: usize,
    ) -> Result<Vec<CandidateCompany>, DatasetLoadError> {
        let candidates = self.select_top_candidates(icp, limit).await?;
        Ok(candidates
            .iter()
            .map(|c| CandidateCompany::from(&c.record))
            .collect())
    }
}

/// Scores every record, sorts descending (stable) and keeps the first `candidate_count`.
/// Only the kept records are cloned out of the dataset.
pub fn rank_candidates(
    records: &[BusinessRecord],
    scorer: &dyn CandidateScorer,
    icp: &IcpDefinition,
    candidate_count: usize,
) -> Vec<ScoredCandidate> {
    let target = IcpTarget::from(icp);

    let mut scored: Vec<(usize, u32)> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (index, scorer.score(record, &target)))
        .collect();

    // `sort_by` is stable: equal scores keep dataset order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(candidate_count);

    scored
        .into_iter()
        .map(|(index, score)| ScoredCandidate {
            index,
            record: records[index].clone(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::CsvFileSource;
    use crate::matching::scorer::HeuristicScorer;

    fn record(name: &str, sic_name: &str, city: &str, state: &str, sales: &str) -> BusinessRecord {
        BusinessRecord {
            business_name: name.to_string(),
            sic_name: sic_name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            sales_volume: sales.to_string(),
            ..Default::default()
        }
    }

    fn scenario() -> Vec<BusinessRecord> {
        vec![
            record("A", "software consulting", "Austin", "TX", "50 Million"),
            record("B", "retail", "Dallas", "TX", "Unknown"),
            record("C", "software development", "Austin", "TX", "200 Million"),
        ]
    }

    fn icp(industry: &str, location: &str, revenue: &str) -> IcpDefinition {
        IcpDefinition {
            industry: Some(industry.to_string()),
            location: Some(location.to_string()),
            revenue: Some(revenue.to_string()),
        }
    }

    fn names(candidates: &[ScoredCandidate]) -> Vec<&str> {
        candidates
            .iter()
            .map(|c| c.record.business_name.as_str())
            .collect()
    }

    #[test]
    fn test_scenario_top_two_keeps_dataset_order_on_ties() {
        let records = scenario();
        let top = rank_candidates(&records, &HeuristicScorer, &icp("software", "austin tx", "m"), 2);

        assert_eq!(names(&top), vec!["A", "C"]);
        assert_eq!(top[0].score, 14);
        assert_eq!(top[1].score, 14);
        assert_eq!(top[0].index, 0);
        assert_eq!(top[1].index, 2);
    }

    #[test]
    fn test_results_sorted_descending() {
        let mut records = scenario();
        records.push(record("D", "software", "Houston", "", ""));
        let ranked = rank_candidates(&records, &HeuristicScorer, &icp("software", "austin tx", "m"), 10);

        assert_eq!(names(&ranked), vec!["A", "C", "D", "B"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_size_is_min_of_k_and_dataset() {
        let records = scenario();
        let target = icp("software", "austin tx", "m");
        for k in 0..6 {
            let ranked = rank_candidates(&records, &HeuristicScorer, &target, k);
            assert_eq!(ranked.len(), k.min(records.len()));
        }
    }

    #[test]
    fn test_all_floor_scores_preserve_original_order() {
        let records: Vec<_> = (0..5)
            .map(|i| record(&format!("R{i}"), "mining", "Boise", "ID", ""))
            .collect();
        let ranked = rank_candidates(&records, &HeuristicScorer, &IcpDefinition::default(), 5);

        assert!(ranked.iter().all(|c| c.score == 1));
        assert_eq!(
            ranked.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_empty_dataset_yields_empty_selection() {
        let ranked = rank_candidates(&[], &HeuristicScorer, &IcpDefinition::default(), 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_projection_blanks_become_none_and_contact_is_trimmed() {
        let r = BusinessRecord {
            business_name: "Acme".to_string(),
            email: "  ops@acme.test ".to_string(),
            phone: "   ".to_string(),
            ..Default::default()
        };
        let company = CandidateCompany::from(&r);

        assert_eq!(company.business_name.as_deref(), Some("Acme"));
        assert_eq!(company.email.as_deref(), Some("ops@acme.test"));
        assert_eq!(company.phone, None);
        assert_eq!(company.web, None);
    }

    #[test]
    fn test_projection_serializes_camel_case_without_score() {
        let company = CandidateCompany::from(&record("A", "software", "Austin", "TX", ""));
        let json = serde_json::to_value(&company).unwrap();

        assert_eq!(json["businessName"], "A");
        assert_eq!(json["sicName"], "software");
        assert!(json.get("score").is_none());
        assert!(json.get("index").is_none());
    }

    #[tokio::test]
    async fn test_get_candidates_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("business_dataset.csv");
        std::fs::write(
            &path,
            "BUSINESS NAME,SIC NAME1,MAILING CITY,MAILING STATE,SALES VOLUME,EMAIL\n\
             A,software consulting,Austin,TX,50 Million,a@a.test\n\
             B,retail,Dallas,TX,Unknown,\n\
             C,software development,Austin,TX,200 Million,c@c.test\n",
        )
        .unwrap();

        let selector = CandidateSelector::new(
            Arc::new(DatasetCache::new(Arc::new(CsvFileSource::new(&path)))),
            Arc::new(HeuristicScorer),
        );

        let companies = selector
            .get_candidates(&icp("retail", "dallas", ""), 2)
            .await
            .unwrap();

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].business_name.as_deref(), Some("B"));
        assert_eq!(companies[0].email, None);
        assert_eq!(companies[1].business_name.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_selector_propagates_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let selector = CandidateSelector::new(
            Arc::new(DatasetCache::new(Arc::new(CsvFileSource::new(
                dir.path().join("missing.csv"),
            )))),
            Arc::new(HeuristicScorer),
        );

        let result = selector
            .select_top_candidates(&IcpDefinition::default(), 5)
            .await;
        assert!(matches!(result, Err(DatasetLoadError::Io { .. })));
    }
}
