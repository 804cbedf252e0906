use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::{PreferenceError, PreferenceProfile};
use crate::models::{Criterion, RankingMethod};

/// Per-criterion importance, 1 (not important) to 5 (very important)
///
/// Every criterion is required; a body missing one is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImportanceInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(range(min = 1, max = 5))]
    pub price: u8,
    #[validate(range(min = 1, max = 5))]
    pub distance: u8,
    #[validate(range(min = 1, max = 5))]
    pub pets: u8,
    #[validate(range(min = 1, max = 5))]
    pub live_music: u8,
    #[validate(range(min = 1, max = 5))]
    pub outdoor_seating: u8,
    #[validate(range(min = 1, max = 5))]
    pub vegetarian: u8,
    #[validate(range(min = 1, max = 5))]
    pub child_menu: u8,
}

impl ImportanceInput {
    pub fn to_profile(&self) -> Result<PreferenceProfile, PreferenceError> {
        PreferenceProfile::new([
            (Criterion::Rating, self.rating),
            (Criterion::Price, self.price),
            (Criterion::Distance, self.distance),
            (Criterion::Pets, self.pets),
            (Criterion::LiveMusic, self.live_music),
            (Criterion::OutdoorSeating, self.outdoor_seating),
            (Criterion::Vegetarian, self.vegetarian),
            (Criterion::ChildMenu, self.child_menu),
        ])
    }
}

/// Request to rank restaurants
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(nested)]
    pub importance: ImportanceInput,
    #[serde(default)]
    pub method: RankingMethod,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    #[serde(alias = "credibility_threshold", rename = "credibilityThreshold")]
    pub credibility_threshold: Option<f64>,
    /// Include the credibility matrix in outranking responses
    #[serde(default, alias = "include_matrix", rename = "includeMatrix")]
    pub include_matrix: bool,
}
