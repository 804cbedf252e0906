use futures::{stream, StreamExt};

use crate::models::{PlaceRecord, Zone};
use crate::services::{PlacesClient, PlacesError, ZoneCache};

/// Merged result of querying every zone
#[derive(Debug, Clone, Default)]
pub struct ZoneHarvest {
    /// Records of all zones, concatenated in zone order
    pub records: Vec<PlaceRecord>,
    pub zones_queried: usize,
    pub failed_zones: usize,
}

/// Queries a list of zones on a bounded pool
///
/// A failing zone is logged and contributes no records; the other zones
/// still count.
pub struct ZoneHarvester {
    client: PlacesClient,
    cache: Option<ZoneCache>,
    concurrency: usize,
}

impl ZoneHarvester {
    pub fn new(client: PlacesClient, cache: Option<ZoneCache>, concurrency: usize) -> Self {
        Self {
            client,
            cache,
            concurrency: concurrency.max(1),
        }
    }

    pub fn cache(&self) -> Option<&ZoneCache> {
        self.cache.as_ref()
    }

    async fn fetch_zone(&self, zone: &Zone) -> Result<Vec<PlaceRecord>, PlacesError> {
        if let Some(cache) = &self.cache {
            if let Some(records) = cache.get(zone).await {
                return Ok(records);
            }
        }

        let records = self.client.search_nearby(zone).await?;

        if let Some(cache) = &self.cache {
            cache.insert(zone, records.clone()).await;
        }

        Ok(records)
    }

    /// Query every zone and merge the results
    pub async fn harvest(&self, zones: &[Zone]) -> ZoneHarvest {
        // `buffered` keeps zone order while running up to `concurrency` requests
        let outcomes: Vec<(Zone, Result<Vec<PlaceRecord>, PlacesError>)> = stream::iter(zones)
            .map(|zone| async move { (*zone, self.fetch_zone(zone).await) })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut harvest = ZoneHarvest {
            zones_queried: zones.len(),
            ..ZoneHarvest::default()
        };

        for (zone, outcome) in outcomes {
            match outcome {
                Ok(records) => harvest.records.extend(records),
                Err(e) => {
                    tracing::warn!(
                        "Zone ({}, {}) failed, continuing without it: {}",
                        zone.latitude,
                        zone.longitude,
                        e
                    );
                    harvest.failed_zones += 1;
                }
            }
        }

        tracing::info!(
            "Harvested {} records from {} zones ({} failed)",
            harvest.records.len(),
            harvest.zones_queried,
            harvest.failed_zones
        );

        harvest
    }
}
