//! Store doubles that fail on purpose.

use async_trait::async_trait;
use charger_scout::store::{AttributeStore, GeoHit, GeoIndex, MemoryStore, RawAttributes};
use charger_scout::{Coordinates, StoreError};
use std::collections::HashSet;
use std::sync::Arc;

/// Delegates to a [`MemoryStore`] but fails attribute lookups for chosen keys
pub struct FlakyAttributes {
    pub inner: Arc<MemoryStore>,
    pub failing_keys: HashSet<String>,
}

impl FlakyAttributes {
    pub fn new(inner: Arc<MemoryStore>, failing_keys: &[&str]) -> Self {
        Self {
            inner,
            failing_keys: failing_keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[async_trait]
impl AttributeStore for FlakyAttributes {
    async fn hset_all(&self, key: &str, fields: RawAttributes) -> Result<(), StoreError> {
        self.inner.hset_all(key, fields).await
    }

    async fn hget_all(&self, key: &str) -> Result<Option<RawAttributes>, StoreError> {
        if self.failing_keys.contains(key) {
            return Err(StoreError::Unavailable(format!("read of {key} reset")));
        }
        self.inner.hget_all(key).await
    }
}

/// Geo index whose every call fails as if the connection were refused
pub struct DownIndex;

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
