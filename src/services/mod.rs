// Service exports
pub mod cache;
pub mod export;
pub mod harvest;
pub mod places;

pub use cache::{CacheKey, CacheStats, ZoneCache};
pub use export::{report_to_csv, write_report_file, ExportError};
pub use harvest::{ZoneHarvest, ZoneHarvester};
pub use places::{PlacesClient, PlacesError, SearchOptions, FIELD_MASK};
