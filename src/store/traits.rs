use crate::error::StoreError;
use crate::models::Coordinates;
use crate::store::types::{GeoHit, RawAttributes};
use async_trait::async_trait;

/// Radius-queryable set of points, keyed by a set name
///
/// Mirrors the geo primitives of a key/value store: members are unique per
/// key and re-adding a member moves it.
#[async_trait]
pub trait GeoIndex: Send + Sync {
    /// Insert or move `member` in the set stored at `key`
    async fn geo_add(&self, key: &str, member: &str, lng: f64, lat: f64) -> Result<(), StoreError>;

    /// Members within `radius_km` of `origin`, nearest first, at most `count`
    async fn geo_search(
        &self,
        key: &str,
        origin: Coordinates,
        radius_km: f64,
        count: usize,
    ) -> Result<Vec<GeoHit>, StoreError>;
}

/// Per-key field/value records
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Replace the fields stored at `key`
    async fn hset_all(&self, key: &str, fields: RawAttributes) -> Result<(), StoreError>;

    /// All fields stored at `key`, or `None` when the key does not exist
    async fn hget_all(&self, key: &str) -> Result<Option<RawAttributes>, StoreError>;
}
