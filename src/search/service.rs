use crate::error::SearchError;
use crate::models::{Query, ResultRecord};
use crate::search::assemble::merge;
use crate::search::attributes::AttributeAdapter;
use crate::search::filter::apply;
use crate::search::index::GeoIndexAdapter;
use crate::store::{AttributeStore, GeoIndex};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Single entry point for proximity searches
///
/// Holds no per-request state; clone it freely across tasks. The store
/// clients are shared and owned by whoever built the service.
#[derive(Clone)]
pub struct ChargerSearch {
    index: GeoIndexAdapter,
    attributes: AttributeAdapter,
}

impl ChargerSearch {
    pub fn new(index: GeoIndexAdapter, attributes: AttributeAdapter) -> Self {
        Self { index, attributes }
    }

    /// Build a service over one store serving both the index and the records
    pub fn with_store<S>(store: Arc<S>, geo_key: &str, key_prefix: &str) -> Self
    where
        S: GeoIndex + AttributeStore + 'static,
    {
        Self::new(
            GeoIndexAdapter::new(store.clone(), geo_key),
            AttributeAdapter::new(store, key_prefix),
        )
    }

    /// Radius lookup, concurrent attribute fetch, merge, filter, sort
    ///
    /// No match is an empty list. Only an unreachable index fails the call.
    pub async fn search(&self, query: &Query) -> Result<Vec<ResultRecord>, SearchError> {
        query.validate()?;

        let hits = self
            .index
            .find_within_radius(query.origin, query.radius_km, query.limit)
            .await?;
        if hits.is_empty() {
            debug!("No chargers within {} km", query.radius_km);
            return Ok(Vec::new());
        }

        let ids: Vec<String> = hits.iter().map(|hit| hit.member.clone()).collect();
        let attributes = self.attributes.fetch_attributes(&ids).await;
        let merged = merge(query.origin, hits, attributes);
        let candidates = merged.len();
        let results = apply(merged, query);

        info!(
            "Search at ({}, {}) r={} km: {} candidates, {} results, sort {:?}",
            query.origin.lat,
            query.origin.lng,
            query.radius_km,
            candidates,
            results.len(),
            query.sort
        );
        Ok(results)
    }

    /// [`ChargerSearch::search`] bounded by `timeout`; in-flight store calls
    /// are dropped when it expires
    pub async fn search_with_timeout(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        tokio::time::timeout(timeout, self.search(query))
            .await
            .map_err(|_| SearchError::Timeout(timeout.as_millis() as u64))?
    }

    /// [`ChargerSearch::search`] that aborts as soon as `cancel` fires
    pub async fn search_cancellable(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResultRecord>, SearchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SearchError::Cancelled),
            results = self.search(query) => results,
        }
    }
}
