use crate::error::SearchError;
use crate::geo::haversine_km;
use crate::models::Coordinates;
use crate::store::{GeoHit, GeoIndex};
use std::sync::Arc;
use tracing::{debug, warn};

/// Radius lookups against one named geo set
#[derive(Clone)]
pub struct GeoIndexAdapter {
    index: Arc<dyn GeoIndex>,
    key: String,
}

impl GeoIndexAdapter {
    pub fn new(index: Arc<dyn GeoIndex>, key: impl Into<String>) -> Self {
        Self {
            index,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Hits within `radius_km` of `origin`, nearest first, at most `limit`
    ///
    /// Distances reported by the store are kept as-is. Hits without one get a
    /// haversine distance from their echoed coordinates when those exist.
    pub async fn find_within_radius(
        &self,
        origin: Coordinates,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<GeoHit>, SearchError> {
        let mut hits = self
            .index
            .geo_search(&self.key, origin, radius_km, limit)
            .await
            .map_err(|e| {
                warn!("Radius query on {} failed: {}", self.key, e);
                SearchError::IndexUnavailable(e)
            })?;

        hits.truncate(limit);
        for hit in hits.iter_mut() {
            if hit.distance_km.is_none() {
                hit.distance_km = hit.coords.map(|coords| haversine_km(origin, coords));
            }
        }

        debug!("Index {} returned {} hits within {} km", self.key, hits.len(), radius_km);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    const KEY: &str = "chargers:geo";

    fn origin() -> Coordinates {
        Coordinates { lat: 1.3521, lng: 103.8198 }
    }

    struct DownIndex;

    #[async_trait]
    impl GeoIndex for DownIndex {
        async fn geo_add(&self, _: &str, _: &str, _: f64, _: f64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn geo_search(
            &self,
            _: &str,
            _: Coordinates,
            _: f64,
            _: usize,
        ) -> Result<Vec<GeoHit>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn store_distance_is_kept() {
        let store = Arc::new(MemoryStore::new());
        store.geo_add(KEY, "c1", 103.8223, 1.2644).await.unwrap();
        let adapter = GeoIndexAdapter::new(store.clone(), KEY);

        let hits = adapter.find_within_radius(origin(), 30.0, 10).await.unwrap();
        let direct = store.geo_search(KEY, origin(), 30.0, 10).await.unwrap();
        assert_eq!(hits, direct);
    }

    #[tokio::test]
    async fn missing_distance_falls_back_to_haversine() {
        let store = Arc::new(MemoryStore::new().with_distance(false));
        store.geo_add(KEY, "c1", 103.8223, 1.2644).await.unwrap();
        let adapter = GeoIndexAdapter::new(store, KEY);

        let hits = adapter.find_within_radius(origin(), 30.0, 10).await.unwrap();
        let expected = haversine_km(origin(), Coordinates { lat: 1.2644, lng: 103.8223 });
        assert_eq!(hits[0].distance_km, Some(expected));
    }

    #[tokio::test]
    async fn no_distance_and_no_coords_stays_unknown() {
        let store = Arc::new(MemoryStore::new().with_distance(false).with_coords(false));
        store.geo_add(KEY, "c1", 103.8223, 1.2644).await.unwrap();
        let adapter = GeoIndexAdapter::new(store, KEY);

        let hits = adapter.find_within_radius(origin(), 30.0, 10).await.unwrap();
        assert_eq!(hits[0].distance_km, None);
    }

    #[tokio::test]
    async fn empty_radius_is_not_an_error() {
        let adapter = GeoIndexAdapter::new(Arc::new(MemoryStore::new()), KEY);
        assert!(adapter.find_within_radius(origin(), 5.0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_index_unavailable() {
        let adapter = GeoIndexAdapter::new(Arc::new(DownIndex), KEY);
        let err = adapter.find_within_radius(origin(), 5.0, 10).await.unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable(StoreError::Unavailable(_))));
    }
}
