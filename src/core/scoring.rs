use serde::{Deserialize, Serialize};

use crate::core::preferences::SumNormalizedWeights;
use crate::models::{Candidate, Criterion, GeoPoint};

/// Inclusive value range of a continuous criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Bounds used to normalize rating and price tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub rating: Bounds,
    pub price: Bounds,
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self {
            rating: Bounds::new(0.0, 5.0),
            price: Bounds::new(1.0, 4.0),
        }
    }
}

/// Calculate the weighted-sum score of a candidate
///
/// Scoring formula:
/// score = (
///     w[distance] * 1 / (1 + distance_km) +   # Closer = higher score
///     w[rating] * normalized rating +
///     w[price] * normalized price tier +
///     Σ w[amenity] * (flag ? 1 : 0)
/// )
///
/// Weights sum to 1 so the score is bounded by 1 for in-range inputs. No
/// clamping is applied; an unknown price tier (0) below `bounds.price.min`
/// contributes negatively.
pub fn calculate_score(
    candidate: &Candidate,
    weights: &SumNormalizedWeights,
    bounds: &ScoreBounds,
    user: GeoPoint,
) -> f64 {
    let distance_km = candidate.distance_from(user);

    let mut score = weights.get(Criterion::Distance) * calculate_distance_score(distance_km)
        + weights.get(Criterion::Rating)
            * normalize_continuous(candidate.rating, bounds.rating.min, bounds.rating.max)
        + weights.get(Criterion::Price)
            * normalize_continuous(
                f64::from(candidate.price_tier),
                bounds.price.min,
                bounds.price.max,
            );

    for criterion in Criterion::BOOLEAN {
        if candidate.amenities.flag(criterion).unwrap_or(false) {
            score += weights.get(criterion);
        }
    }

    score
}

/// Min-max normalization, 0 when the range is empty
#[inline]
pub fn normalize_continuous(value: f64, min: f64, max: f64) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// Distance utility (0-1]
/// Reciprocal decay rather than min-max: 1 at the user's position
#[inline]
fn calculate_distance_score(distance_km: f64) -> f64 {
    1.0 / (1.0 + distance_km)
}
