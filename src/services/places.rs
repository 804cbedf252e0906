use crate::models::{
    places::{Center, Circle, LocationRestriction},
    PlaceRecord, SearchNearbyRequest, SearchNearbyResponse, Zone,
};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Fields requested from the places API
pub const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.rating,\
places.allowsDogs,places.liveMusic,places.outdoorSeating,places.servesVegetarianFood,\
places.menuForChildren,places.priceLevel,places.location";

/// Errors that can occur when interacting with the places API
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,
}

/// Search filters sent with every nearby query
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub included_types: Vec<String>,
    pub excluded_types: Vec<String>,
    pub language_code: String,
    pub max_result_count: u8,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            included_types: [
                "restaurant",
                "french_restaurant",
                "italian_restaurant",
                "japanese_restaurant",
                "greek_restaurant",
                "indian_restaurant",
                "mexican_restaurant",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            excluded_types: ["cafe", "fast_food_restaurant", "bar"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            language_code: "fr".to_string(),
            max_result_count: 10,
        }
    }
}

/// Places API client
///
/// Issues one `searchNearby` call per zone. Requests time out after the
/// configured duration.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    base_url: String,
    api_key: String,
    client: Client,
    options: SearchOptions,
}

impl PlacesClient {
    /// Create a new places client
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
        options: SearchOptions,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            options,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/v1/places:searchNearby", self.base_url.trim_end_matches('/'))
    }

    fn search_body(&self, zone: &Zone) -> SearchNearbyRequest {
        SearchNearbyRequest {
            included_types: self.options.included_types.clone(),
            excluded_types: self.options.excluded_types.clone(),
            language_code: self.options.language_code.clone(),
            max_result_count: self.options.max_result_count,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: Center {
                        latitude: zone.latitude,
                        longitude: zone.longitude,
                    },
                    radius: zone.radius_m,
                },
            },
        }
    }

    /// Query the places within one zone
    pub async fn search_nearby(&self, zone: &Zone) -> Result<Vec<PlaceRecord>, PlacesError> {
        let url = self.search_url();

        tracing::debug!(
            "Searching places around ({}, {}) r={}m",
            zone.latitude,
            zone.longitude,
            zone.radius_m
        );

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&self.search_body(zone))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlacesError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(PlacesError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SearchNearbyResponse = response.json().await?;

        tracing::debug!(
            "Zone ({}, {}) returned {} places",
            zone.latitude,
            zone.longitude,
            payload.places.len()
        );

        Ok(payload.places)
    }
}
