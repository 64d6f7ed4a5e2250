use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::Site;
use crate::record::{merge_results, MergedRecord, SourceResults};
use crate::sources::{SourceError, SourceResult, Upstream};
use crate::store::{CacheStore, StoreError, LAST_UPDATE_KEY, RECORD_KEY};
use crate::utils::{parse_instant, to_iso};

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Primary source unavailable: {0}")]
    PrimaryUnavailable(SourceError),
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write record: {0}")]
    Store(#[from] StoreError),
}

/// Runs the fetch, merge and cache-write cycle. Cheap to share; concurrent
/// refreshes are allowed since every write replaces the whole record.
pub struct Refresher {
    upstream: Arc<dyn Upstream>,
    store: Arc<dyn CacheStore>,
    site: Site,
    stale_after: Duration,
}

impl Refresher {
    pub fn new(
        upstream: Arc<dyn Upstream>,
        store: Arc<dyn CacheStore>,
        site: Site,
        stale_after: Duration,
    ) -> Self {
        Self {
            upstream,
            store,
            site,
            stale_after,
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub async fn refresh(&self) -> Result<MergedRecord, RefreshError> {
        tracing::info!("Fetching data...");

        let (nearest_city, air_pollution, one_call, community_feed, area_summary) = tokio::join!(
            self.upstream.nearest_city(),
            self.upstream.air_pollution(),
            self.upstream.one_call(),
            self.upstream.community_feed(),
            self.upstream.area_summary(),
        );

        let air_pollution = air_pollution.map_err(RefreshError::PrimaryUnavailable)?;

        let results = SourceResults {
            nearest_city: settle("AirVisual nearest city", nearest_city),
            air_pollution: Some(air_pollution),
            one_call: settle("OpenWeather one call", one_call),
            community_feed: settle("WAQI feed", community_feed),
            area_summary: settle("area summary", area_summary),
        };

        let record = merge_results(&self.site, &results);
        let serialized = serde_json::to_string(&record)?;
        self.store.set(RECORD_KEY, serialized).await?;
        tracing::info!("Data updated successfully");

        if let Err(e) = self.store.set(LAST_UPDATE_KEY, to_iso(Utc::now())).await {
            tracing::warn!("Error setting last update: {}", e);
        }

        Ok(record)
    }

    /// When the cached record was last written. Missing, unreadable and
    /// unparsable timestamps all come back as `None`.
    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        match self.store.get(LAST_UPDATE_KEY).await {
            Ok(Some(raw)) => {
                let parsed = parse_instant(&raw);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unparsable last update timestamp {:?}", raw);
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read last update timestamp: {}", e);
                None
            }
        }
    }

    /// Refresh synchronously if the cached record is older than the
    /// staleness threshold. Returns whether a refresh was attempted.
    pub async fn refresh_if_stale(&self) -> bool {
        let last_update = self.last_update().await;
        if !is_stale(last_update, Utc::now(), self.stale_after) {
            return false;
        }

        tracing::debug!("Cached record is stale (last update {:?}), refreshing", last_update);
        if let Err(e) = self.refresh().await {
            tracing::error!("Refresh failed: {}", e);
        }
        true
    }
}

/// Collapse a non-primary source result, logging the failure.
fn settle<T>(source: &str, result: SourceResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(SourceError::NotConfigured(_)) => {
            tracing::debug!("Skipping {}: not configured", source);
            None
        }
        Err(e) => {
            tracing::warn!("Error fetching {}: {}", source, e);
            None
        }
    }
}

pub fn is_stale(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>, threshold: Duration) -> bool {
    match last_update {
        Some(at) => now - at > threshold,
        None => true,
    }
}

/// The first instant strictly after `now` that is a whole multiple of
/// `every` since the Unix epoch, e.g. :00/:15/:30/:45 for 15 minutes.
pub fn next_boundary(now: DateTime<Utc>, every: Duration) -> DateTime<Utc> {
    let step = every.num_milliseconds().max(1);
    let elapsed = now.timestamp_millis();
    let next = (elapsed.div_euclid(step) + 1) * step;
    DateTime::from_timestamp_millis(next).unwrap_or(now + every)
}

/// Refresh once now, then on every wall-clock boundary of `every`.
pub fn spawn_schedule(refresher: Arc<Refresher>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Performing initial data fetch...");
        if let Err(e) = refresher.refresh().await {
            tracing::error!("Initial refresh failed: {}", e);
        }

        loop {
            let now = Utc::now();
            let wait = (next_boundary(now, every) - now)
                .to_std()
                .unwrap_or_default();
            tokio::time::sleep(wait).await;

            tracing::info!("Running scheduled data fetch...");
            if let Err(e) = refresher.refresh().await {
                tracing::error!("Scheduled refresh failed: {}", e);
            }
        }
    })
}
