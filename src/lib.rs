//! Resto Rank - multicriteria restaurant recommendation service
//!
//! Restaurants are collected from a places API over a set of circular zones,
//! cleaned and deduplicated, then either ranked by a weighted sum or analysed
//! with an ELECTRE-style outranking procedure that exposes the core of
//! non-outranked candidates.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    haversine_distance, OutrankingEngine, OutrankingParams, PreferenceProfile, Recommendation,
    RecommendationQuery, Recommender, Report,
};
pub use models::{Candidate, Criterion, GeoPoint, PlaceRecord, RankingMethod, Zone};
