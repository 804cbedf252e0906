use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::distance::haversine_distance;

/// Placeholder name used when the places API omits a display name
pub const UNKNOWN_NAME: &str = "Unknown";

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to another point in kilometers
    #[inline]
    pub fn distance_km(&self, other: GeoPoint) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Circular search area handed to the places API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "radiusM", alias = "radius_m")]
    pub radius_m: f64,
}

impl Zone {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Decision criteria, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Rating,
    Price,
    Distance,
    Pets,
    LiveMusic,
    OutdoorSeating,
    Vegetarian,
    ChildMenu,
}

/// Whether larger raw values are better (gain) or worse (cost)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Gain,
    Cost,
}

impl Criterion {
    pub const COUNT: usize = 8;

    pub const ALL: [Criterion; Criterion::COUNT] = [
        Criterion::Rating,
        Criterion::Price,
        Criterion::Distance,
        Criterion::Pets,
        Criterion::LiveMusic,
        Criterion::OutdoorSeating,
        Criterion::Vegetarian,
        Criterion::ChildMenu,
    ];

    /// Amenity criteria scored as 0/1
    pub const BOOLEAN: [Criterion; 5] = [
        Criterion::Pets,
        Criterion::LiveMusic,
        Criterion::OutdoorSeating,
        Criterion::Vegetarian,
        Criterion::ChildMenu,
    ];

    /// Position of the criterion in [`Criterion::ALL`]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Criterion::Rating => "rating",
            Criterion::Price => "price",
            Criterion::Distance => "distance",
            Criterion::Pets => "pets",
            Criterion::LiveMusic => "live_music",
            Criterion::OutdoorSeating => "outdoor_seating",
            Criterion::Vegetarian => "vegetarian",
            Criterion::ChildMenu => "child_menu",
        }
    }

    pub const fn orientation(self) -> Orientation {
        match self {
            Criterion::Distance => Orientation::Cost,
            _ => Orientation::Gain,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Restaurant amenities reported by the places API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
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
}

impl Amenities {
    /// Flag backing a boolean criterion, `None` for continuous criteria
    pub fn flag(&self, criterion: Criterion) -> Option<bool> {
        match criterion {
            Criterion::Pets => Some(self.accepts_pets),
            Criterion::LiveMusic => Some(self.live_music),
            Criterion::OutdoorSeating => Some(self.outdoor_seating),
            Criterion::Vegetarian => Some(self.vegetarian_options),
            Criterion::ChildMenu => Some(self.child_menu),
            Criterion::Rating | Criterion::Price | Criterion::Distance => None,
        }
    }
}

/// A restaurant returned by the places search, in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub address: Option<String>,
    pub rating: f64,
    #[serde(rename = "priceTier")]
    pub price_tier: u8,
    pub amenities: Amenities,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "distanceKm", default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Candidate {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Deduplication key
    pub fn identity(&self) -> (&str, Option<&str>) {
        (self.name.as_str(), self.address.as_deref())
    }

    /// Returns the candidate with its distance to `user` filled in
    pub fn located_from(self, user: GeoPoint) -> Self {
        let distance_km = user.distance_km(self.location());
        Self {
            distance_km: Some(distance_km),
            ..self
        }
    }

    /// Returns the candidate carrying its weighted-sum score
    pub fn scored(self, score: f64) -> Self {
        Self {
            score: Some(score),
            ..self
        }
    }

    /// Distance to `user`, reusing the located value when present
    pub fn distance_from(&self, user: GeoPoint) -> f64 {
        self.distance_km
            .unwrap_or_else(|| user.distance_km(self.location()))
    }

    /// Raw value of a criterion for this candidate
    ///
    /// Booleans map to 0/1 and distance is measured from `user`.
    pub fn criterion_value(&self, criterion: Criterion, user: GeoPoint) -> f64 {
        match criterion {
            Criterion::Rating => self.rating,
            Criterion::Price => f64::from(self.price_tier),
            Criterion::Distance => self.distance_from(user),
            _ => {
                if self.amenities.flag(criterion).unwrap_or(false) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Ranking strategy requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMethod {
    /// Linear combination of normalized criteria, top-N by score
    WeightedSum,
    /// ELECTRE-style outranking, report the non-dominated core
    #[default]
    Outranking,
}

impl fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingMethod::WeightedSum => f.write_str("weighted_sum"),
            RankingMethod::Outranking => f.write_str("outranking"),
        }
    }
}
