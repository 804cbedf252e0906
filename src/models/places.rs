use serde::{Deserialize, Serialize};

/// Raw place record as returned by the places `searchNearby` endpoint
///
/// Every field is optional; the normalizer decides on defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub allows_dogs: Option<bool>,
    pub live_music: Option<bool>,
    pub outdoor_seating: Option<bool>,
    pub serves_vegetarian_food: Option<bool>,
    pub menu_for_children: Option<bool>,
    pub price_level: Option<String>,
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Body of a `searchNearby` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
}

/// Body of a `searchNearby` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest {
    pub included_types: Vec<String>,
    pub excluded_types: Vec<String>,
    pub language_code: String,
    pub max_result_count: u8,
    pub location_restriction: LocationRestriction,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    pub center: Center,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Center {
    pub latitude: f64,
    pub longitude: f64,
}
