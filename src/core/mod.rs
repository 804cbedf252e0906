// Core algorithm exports
pub mod distance;
pub mod normalizer;
pub mod outranking;
pub mod preferences;
pub mod recommender;
pub mod report;
pub mod scoring;
pub mod thresholds;

pub use distance::haversine_distance;
pub use normalizer::{normalize, normalize_all, price_tier, MalformedRecordError, PriceLevel};
pub use outranking::{OutrankingAnalysis, OutrankingEngine, OutrankingParams, PairwiseMatrix};
pub use preferences::{
    Importance, MaxRelativeImportance, PreferenceError, PreferenceProfile, SumNormalizedWeights,
};
pub use recommender::{Recommendation, RecommendationQuery, RecommendError, Recommender};
pub use report::{deduplicate, rank_by_score, Report, ReportRow};
pub use scoring::{calculate_score, normalize_continuous, Bounds, ScoreBounds};
pub use thresholds::{derive_thresholds, CriterionMaxima, ThresholdMap, Thresholds};
