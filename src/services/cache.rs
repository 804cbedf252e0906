use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{PlaceRecord, Zone};

/// In-memory cache of per-zone search results
///
/// Entries expire after the configured TTL; only successful queries are
/// stored.
#[derive(Clone)]
pub struct ZoneCache {
    entries: Cache<String, Arc<Vec<PlaceRecord>>>,
    ttl_secs: u64,
}

impl ZoneCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, ttl_secs }
    }

    pub async fn get(&self, zone: &Zone) -> Option<Vec<PlaceRecord>> {
        let key = CacheKey::zone(zone);
        let hit = self.entries.get(&key).await;
        if hit.is_some() {
            tracing::trace!("Zone cache hit: {}", key);
        }
        hit.map(|records| records.as_ref().clone())
    }

    pub async fn insert(&self, zone: &Zone, records: Vec<PlaceRecord>) {
        let key = CacheKey::zone(zone);
        self.entries.insert(key.clone(), Arc::new(records)).await;
        tracing::trace!("Zone cache set: {}", key);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a search zone
    pub fn zone(zone: &Zone) -> String {
        format!("zone:{}:{}:{}", zone.latitude, zone.longitude, zone.radius_m)
    }
}
