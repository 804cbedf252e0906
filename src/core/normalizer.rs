use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Amenities, Candidate, PlaceRecord, UNKNOWN_NAME};

/// Price tier assigned when the price level is missing or unrecognized
pub const UNKNOWN_PRICE_TIER: u8 = 0;

/// Raised when a place record lacks the coordinates a candidate requires
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("place record {name:?} is missing its {missing}")]
pub struct MalformedRecordError {
    pub name: Option<String>,
    pub missing: &'static str,
}

/// Categorical price levels used by the places API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceLevel {
    #[serde(rename = "PRICE_LEVEL_INEXPENSIVE")]
    Inexpensive,
    #[serde(rename = "PRICE_LEVEL_MODERATE")]
    Moderate,
    #[serde(rename = "PRICE_LEVEL_EXPENSIVE")]
    Expensive,
    #[serde(rename = "PRICE_LEVEL_VERY_EXPENSIVE")]
    VeryExpensive,
}

impl PriceLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PRICE_LEVEL_INEXPENSIVE" => Some(PriceLevel::Inexpensive),
            "PRICE_LEVEL_MODERATE" => Some(PriceLevel::Moderate),
            "PRICE_LEVEL_EXPENSIVE" => Some(PriceLevel::Expensive),
            "PRICE_LEVEL_VERY_EXPENSIVE" => Some(PriceLevel::VeryExpensive),
            _ => None,
        }
    }

    /// Integer tier from 1 (cheapest) to 4
    pub const fn tier(self) -> u8 {
        match self {
            PriceLevel::Inexpensive => 1,
            PriceLevel::Moderate => 2,
            PriceLevel::Expensive => 3,
            PriceLevel::VeryExpensive => 4,
        }
    }
}

/// Map an optional price label to a tier, falling back to [`UNKNOWN_PRICE_TIER`]
#[inline]
pub fn price_tier(label: Option<&str>) -> u8 {
    label
        .and_then(PriceLevel::from_label)
        .map_or(UNKNOWN_PRICE_TIER, PriceLevel::tier)
}

/// Convert a raw place record into a [`Candidate`]
///
/// Optional fields are defaulted; only missing coordinates are an error.
pub fn normalize(record: PlaceRecord) -> Result<Candidate, MalformedRecordError> {
    let name = record.display_name.and_then(|text| text.text);

    let location = record.location.ok_or_else(|| MalformedRecordError {
        name: name.clone(),
        missing: "location",
    })?;
    let latitude = location.latitude.ok_or_else(|| MalformedRecordError {
        name: name.clone(),
        missing: "latitude",
    })?;
    let longitude = location.longitude.ok_or_else(|| MalformedRecordError {
        name: name.clone(),
        missing: "longitude",
    })?;

    Ok(Candidate {
        name: name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        address: record.formatted_address,
        rating: record.rating.unwrap_or(0.0),
        price_tier: price_tier(record.price_level.as_deref()),
        amenities: Amenities {
            accepts_pets: record.allows_dogs.unwrap_or(false),
            live_music: record.live_music.unwrap_or(false),
            outdoor_seating: record.outdoor_seating.unwrap_or(false),
            vegetarian_options: record.serves_vegetarian_food.unwrap_or(false),
            child_menu: record.menu_for_children.unwrap_or(false),
        },
        latitude,
        longitude,
        distance_km: None,
        score: None,
    })
}

/// Normalize a batch, dropping malformed records
///
/// Returns the surviving candidates in input order and the number dropped.
pub fn normalize_all<I>(records: I) -> (Vec<Candidate>, usize)
where
    I: IntoIterator<Item = PlaceRecord>,
{
    let mut dropped = 0;
    let candidates = records
        .into_iter()
        .filter_map(|record| match normalize(record) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                tracing::warn!("Dropping place record: {}", e);
                dropped += 1;
                None
            }
        })
        .collect();

    (candidates, dropped)
}
