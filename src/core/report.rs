use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Candidate, RankingMethod};

/// Default number of rows in a weighted-sum report
pub const DEFAULT_TOP_N: usize = 5;

/// Keep the first candidate seen for each `(name, address)` pair
pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<(String, Option<String>)> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|candidate| seen.insert((candidate.name.clone(), candidate.address.clone())))
        .collect()
}

/// Sort by score (descending) and then by distance (ascending), keep `limit`
///
/// Unscored candidates sink to the bottom. The sort is stable, so ties keep
/// their input order.
pub fn rank_by_score(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        let a_score = a.score.unwrap_or(f64::NEG_INFINITY);
        let b_score = b.score.unwrap_or(f64::NEG_INFINITY);
        b_score
            .partial_cmp(&a_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let a_distance = a.distance_km.unwrap_or(f64::INFINITY);
                let b_distance = b.distance_km.unwrap_or(f64::INFINITY);
                a_distance.partial_cmp(&b_distance).unwrap_or(Ordering::Equal)
            })
    });

    candidates.truncate(limit);
    candidates
}

/// Flat, tabular view of a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub address: Option<String>,
    pub rating: f64,
    #[serde(rename = "priceTier")]
    pub price_tier: u8,
    #[serde(rename = "acceptsPets")]
    pub accepts_pets: bool,
    #[serde(rename = "liveMusic")]
    pub live_music: bool,
    #[serde(rename = "outdoorSeating")]
    pub outdoor_seating: bool,
    #[serde(rename = "vegetarianOptions")]
    pub vegetarian_options: bool,
    #[serde(rename = "childMenu")]
    pub child_menu: bool,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    pub score: Option<f64>,
}

impl From<&Candidate> for ReportRow {
    fn from(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.clone(),
            address: candidate.address.clone(),
            rating: candidate.rating,
            price_tier: candidate.price_tier,
            accepts_pets: candidate.amenities.accepts_pets,
            live_music: candidate.amenities.live_music,
            outdoor_seating: candidate.amenities.outdoor_seating,
            vegetarian_options: candidate.amenities.vegetarian_options,
            child_menu: candidate.amenities.child_menu,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            distance_km: candidate.distance_km,
            score: candidate.score,
        }
    }
}

/// Final recommendation artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "reportId")]
    pub report_id: Uuid,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    pub method: RankingMethod,
    /// Distinct candidates the ranking was computed over
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    pub rows: Vec<ReportRow>,
    /// Outranking only: non-core candidates outranking all other non-core ones
    #[serde(default)]
    pub dominant: Vec<ReportRow>,
}

impl Report {
    fn new(
        method: RankingMethod,
        total_candidates: usize,
        rows: Vec<ReportRow>,
        dominant: Vec<ReportRow>,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            method,
            total_candidates,
            rows,
            dominant,
        }
    }

    /// Top-`limit` report from scored, deduplicated candidates
    pub fn weighted_sum(scored: Vec<Candidate>, limit: usize) -> Self {
        let total = scored.len();
        let rows = rank_by_score(scored, limit).iter().map(ReportRow::from).collect();
        Self::new(RankingMethod::WeightedSum, total, rows, Vec::new())
    }

    /// Core report; `core` and `dominant` index into `candidates`
    pub fn outranking(candidates: &[Candidate], core: &[usize], dominant: &[usize]) -> Self {
        let pick = |indices: &[usize]| -> Vec<ReportRow> {
            indices
                .iter()
                .filter_map(|&i| candidates.get(i))
                .map(ReportRow::from)
                .collect()
        };
        Self::new(RankingMethod::Outranking, candidates.len(), pick(core), pick(dominant))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amenities;

    fn create_candidate(
        name: &str,
        address: &str,
        score: Option<f64>,
        distance_km: f64,
    ) -> Candidate {
        Candidate {
            name: name.to_string(),
            address: Some(address.to_string()),
            rating: 4.0,
            price_tier: 2,
            amenities: Amenities::default(),
            latitude: 48.86,
            longitude: 2.34,
            distance_km: Some(distance_km),
            score,
        }
    }

    #[test]
    fn test_deduplicate_keeps_first_seen() {
        let candidates = vec![
            create_candidate("Chartier", "7 Rue du Faubourg Montmartre", Some(0.4), 1.0),
            create_candidate("Chartier", "7 Rue du Faubourg Montmartre", Some(0.9), 1.0),
            create_candidate("Chartier", "59 Bd du Montparnasse", Some(0.5), 2.0),
        ];

        let unique = deduplicate(candidates);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].score, Some(0.4));
        assert_eq!(unique[1].address.as_deref(), Some("59 Bd du Montparnasse"));
    }

    #[test]
    fn test_missing_address_is_part_of_identity() {
        let mut no_address = create_candidate("Chez Paul", "", None, 1.0);
        no_address.address = None;
        let with_address = create_candidate("Chez Paul", "13 Rue de Charonne", None, 1.0);

        let unique = deduplicate(vec![no_address.clone(), with_address, no_address]);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_rank_by_score_orders_and_truncates() {
        let candidates = vec![
            create_candidate("a", "1", Some(0.2), 1.0),
            create_candidate("b", "2", Some(0.8), 3.0),
            create_candidate("c", "3", Some(0.8), 1.0),
            create_candidate("d", "4", None, 0.1),
            create_candidate("e", "5", Some(0.5), 1.0),
        ];

        let ranked = rank_by_score(candidates, 3);
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["c", "b", "e"]);
    }

    #[test]
    fn test_outranking_report_rows() {
        let candidates = vec![
            create_candidate("a", "1", None, 1.0),
            create_candidate("b", "2", None, 1.0),
            create_candidate("c", "3", None, 1.0),
        ];

        let report = Report::outranking(&candidates, &[2, 0], &[1]);

        assert_eq!(report.method, RankingMethod::Outranking);
        assert_eq!(report.total_candidates, 3);
        assert_eq!(report.rows[0].name, "c");
        assert_eq!(report.rows[1].name, "a");
        assert_eq!(report.dominant[0].name, "b");
    }

    #[test]
    fn test_weighted_sum_report() {
        let candidates = vec![
            create_candidate("a", "1", Some(0.1), 1.0),
            create_candidate("b", "2", Some(0.7), 1.0),
        ];

        let report = Report::weighted_sum(candidates, DEFAULT_TOP_N);

        assert_eq!(report.total_candidates, 2);
        assert_eq!(report.rows[0].name, "b");
        assert_eq!(report.rows[0].score, Some(0.7));
        assert!(report.dominant.is_empty());
    }
}
