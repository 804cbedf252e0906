use thiserror::Error;

use crate::core::{
    normalizer::normalize_all,
    outranking::{OutrankingEngine, OutrankingParams, PairwiseMatrix},
    preferences::PreferenceProfile,
    report::{deduplicate, Report, DEFAULT_TOP_N},
    scoring::{calculate_score, ScoreBounds},
};
use crate::models::{GeoPoint, PlaceRecord, RankingMethod};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("no usable candidates after collection and cleaning ({dropped} malformed records dropped)")]
    NoCandidates { dropped: usize },
}

/// What the caller wants ranked, and how
#[derive(Debug, Clone)]
pub struct RecommendationQuery {
    pub profile: PreferenceProfile,
    pub method: RankingMethod,
    pub user: GeoPoint,
    /// Weighted-sum only: number of rows to keep
    pub limit: Option<usize>,
    /// Outranking only: overrides the configured credibility cut level
    pub credibility_threshold: Option<f64>,
}

/// Result of the recommendation pipeline
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub report: Report,
    /// Outranking only
    pub credibility: Option<PairwiseMatrix>,
    pub dropped_records: usize,
    pub duplicates_removed: usize,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Normalization of raw place records (malformed ones dropped)
/// 2. Distance to the user
/// 3. Deduplication on `(name, address)`
/// 4. Weighted-sum ranking or outranking analysis
/// 5. Report assembly
#[derive(Debug, Clone)]
pub struct Recommender {
    bounds: ScoreBounds,
    outranking: OutrankingParams,
    default_limit: usize,
}

impl Recommender {
    pub fn new(bounds: ScoreBounds, outranking: OutrankingParams, default_limit: usize) -> Self {
        Self {
            bounds,
            outranking,
            default_limit,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            ScoreBounds::default(),
            OutrankingParams::default(),
            DEFAULT_TOP_N,
        )
    }

    /// Rank the merged records of every zone for one query
    ///
    /// # Arguments
    /// * `records` - Place records from all zones, concatenated in zone order
    /// * `query` - Preferences, method and user location
    ///
    /// # Returns
    /// The report, or `NoCandidates` when nothing survives cleaning
    pub fn recommend(
        &self,
        records: Vec<PlaceRecord>,
        query: &RecommendationQuery,
    ) -> Result<Recommendation, RecommendError> {
        let (candidates, dropped_records) = normalize_all(records);
        let normalized = candidates.len();

        let candidates = deduplicate(
            candidates
                .into_iter()
                .map(|candidate| candidate.located_from(query.user))
                .collect(),
        );
        let duplicates_removed = normalized - candidates.len();

        if candidates.is_empty() {
            return Err(RecommendError::NoCandidates {
                dropped: dropped_records,
            });
        }

        tracing::debug!(
            "Ranking {} candidates with {} ({} dropped, {} duplicates)",
            candidates.len(),
            query.method,
            dropped_records,
            duplicates_removed
        );

        let (report, credibility) = match query.method {
            RankingMethod::WeightedSum => {
                let weights = query.profile.sum_normalized();
                let scored = candidates
                    .into_iter()
                    .map(|candidate| {
                        let score = calculate_score(&candidate, &weights, &self.bounds, query.user);
                        candidate.scored(score)
                    })
                    .collect();
                let limit = query.limit.unwrap_or(self.default_limit);
                (Report::weighted_sum(scored, limit), None)
            }
            RankingMethod::Outranking => {
                let params = OutrankingParams {
                    credibility_threshold: query
                        .credibility_threshold
                        .unwrap_or(self.outranking.credibility_threshold),
                    ..self.outranking
                };
                let engine = OutrankingEngine::new(&query.profile, &params);
                let analysis = engine.analyze(&candidates, query.user);
                let report = Report::outranking(&candidates, &analysis.core, &analysis.dominant);
                (report, Some(analysis.credibility))
            }
        };

        Ok(Recommendation {
            report,
            credibility,
            dropped_records,
            duplicates_removed,
        })
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::Importance;
    use crate::models::{LatLng, LocalizedText};

    const USER: GeoPoint = GeoPoint {
        latitude: 48.8566,
        longitude: 2.3522,
    };

    fn create_record(name: &str, address: &str, rating: f64, lat: f64, lon: f64) -> PlaceRecord {
        PlaceRecord {
            display_name: Some(LocalizedText {
                text: Some(name.to_string()),
                language_code: None,
            }),
            formatted_address: Some(address.to_string()),
            rating: Some(rating),
            price_level: Some("PRICE_LEVEL_MODERATE".to_string()),
            location: Some(LatLng {
                latitude: Some(lat),
                longitude: Some(lon),
            }),
            ..PlaceRecord::default()
        }
    }

    fn create_query(method: RankingMethod) -> RecommendationQuery {
        RecommendationQuery {
            profile: PreferenceProfile::uniform(Importance::try_from(3).unwrap()),
            method,
            user: USER,
            limit: None,
            credibility_threshold: None,
        }
    }

    #[test]
    fn test_weighted_sum_ranks_by_score() {
        let recommender = Recommender::with_defaults();
        let records = vec![
            create_record("Mid", "2 Rue A", 3.0, 48.8566, 2.3522),
            create_record("Top", "1 Rue A", 5.0, 48.8566, 2.3522),
            create_record("Low", "3 Rue A", 1.0, 48.8566, 2.3522),
        ];

        let result = recommender
            .recommend(records, &create_query(RankingMethod::WeightedSum))
            .unwrap();

        let names: Vec<_> = result.report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "Mid", "Low"]);
        assert!(result.credibility.is_none());
    }

    #[test]
    fn test_respects_limit() {
        let recommender = Recommender::with_defaults();
        let records: Vec<_> = (0..20)
            .map(|i| {
                create_record(
                    &format!("Resto {}", i),
                    "Paris",
                    f64::from(i % 5),
                    48.85 + f64::from(i) * 0.001,
                    2.35,
                )
            })
            .collect();
        let mut query = create_query(RankingMethod::WeightedSum);
        query.limit = Some(3);

        let result = recommender.recommend(records, &query).unwrap();

        assert_eq!(result.report.rows.len(), 3);
        assert_eq!(result.report.total_candidates, 20);
    }

    #[test]
    fn test_duplicates_removed_before_ranking() {
        let recommender = Recommender::with_defaults();
        let records = vec![
            create_record("Twin", "1 Rue A", 4.0, 48.8566, 2.3522),
            create_record("Twin", "1 Rue A", 4.0, 48.8566, 2.3522),
            create_record("Other", "2 Rue A", 2.0, 48.8566, 2.3522),
        ];

        let result = recommender
            .recommend(records, &create_query(RankingMethod::Outranking))
            .unwrap();

        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.report.total_candidates, 2);
        let names: Vec<_> = result.report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Twin"]);
    }

    #[test]
    fn test_no_candidates_is_an_error_value() {
        let recommender = Recommender::with_defaults();
        let broken = PlaceRecord {
            formatted_address: Some("nowhere".to_string()),
            ..PlaceRecord::default()
        };

        let empty = recommender.recommend(vec![], &create_query(RankingMethod::Outranking));
        assert_eq!(empty.unwrap_err(), RecommendError::NoCandidates { dropped: 0 });

        let all_broken =
            recommender.recommend(vec![broken], &create_query(RankingMethod::WeightedSum));
        assert_eq!(all_broken.unwrap_err(), RecommendError::NoCandidates { dropped: 1 });
    }

    #[test]
    fn test_credibility_threshold_override() {
        let recommender = Recommender::with_defaults();
        let records = vec![
            create_record("A", "1", 4.0, 48.8566, 2.3522),
            create_record("B", "2", 4.1, 48.8566, 2.3522),
        ];
        let mut query = create_query(RankingMethod::Outranking);
        query.profile = PreferenceProfile::new(
            crate::models::Criterion::ALL
                .map(|c| (c, if c == crate::models::Criterion::Rating { 1 } else { 5 })),
        )
        .unwrap();

        // S[A][B] = 35/36 and S[B][A] = 1: both outranked at the default 0.90
        let default_cut = recommender.recommend(records.clone(), &query).unwrap();
        assert!(default_cut.report.rows.is_empty());

        query.credibility_threshold = Some(0.98);
        let strict_cut = recommender.recommend(records, &query).unwrap();
        let names: Vec<_> = strict_cut.report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);
    }
}
