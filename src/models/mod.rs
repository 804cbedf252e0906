// Model exports
pub mod domain;
pub mod places;
pub mod requests;
pub mod responses;

pub use domain::{Amenities, Candidate, Criterion, GeoPoint, Orientation, RankingMethod, Zone, UNKNOWN_NAME};
pub use places::{LatLng, LocalizedText, PlaceRecord, SearchNearbyRequest, SearchNearbyResponse};
pub use requests::{ImportanceInput, RecommendRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendResponse, ZonesResponse};
