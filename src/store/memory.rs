use crate::error::StoreError;
use crate::geo::haversine_km;
use crate::models::Coordinates;
use crate::store::traits::{AttributeStore, GeoIndex};
use crate::store::types::{GeoHit, RawAttributes};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-process backing store implementing both the geo index and the
/// attribute store
///
/// Share it behind an `Arc`. Once [`MemoryStore::close`] is called every
/// operation fails with [`StoreError::Closed`].
pub struct MemoryStore {
    geo: RwLock<HashMap<String, BTreeMap<String, Coordinates>>>,
    hashes: RwLock<HashMap<String, RawAttributes>>,
    closed: AtomicBool,
    echo_distance: bool,
    echo_coords: bool,
}

impl MemoryStore {
    /// Create an empty store that reports distances and echoes coordinates
    pub fn new() -> Self {
        Self {
            geo: RwLock::new(HashMap::new()),
            hashes: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
            echo_distance: true,
            echo_coords: true,
        }
    }

    /// Whether radius queries report the distance of each hit
    pub fn with_distance(mut self, echo: bool) -> Self {
        self.echo_distance = echo;
        self
    }

    /// Whether radius queries echo the indexed coordinates of each hit
    pub fn with_coords(mut self, echo: bool) -> Self {
        self.echo_coords = echo;
        self
    }

    /// Remove the record stored at `key`. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        Ok(self.hashes.write().await.remove(key).is_some())
    }

    /// Number of members indexed under `key`
    pub async fn geo_len(&self, key: &str) -> Result<usize, StoreError> {
        self.ensure_open()?;
        Ok(self.geo.read().await.get(key).map_or(0, BTreeMap::len))
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("Memory store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoIndex for MemoryStore {
    async fn geo_add(&self, key: &str, member: &str, lng: f64, lat: f64) -> Result<(), StoreError> {
        self.ensure_open()?;
        let coords = Coordinates { lat, lng };
        if !coords.is_valid() {
            return Err(StoreError::Unavailable(format!(
                "invalid coordinates for {member}: lng={lng}, lat={lat}"
            )));
        }
        self.geo
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), coords);
        Ok(())
    }

    async fn geo_search(
        &self,
        key: &str,
        origin: Coordinates,
        radius_km: f64,
        count: usize,
    ) -> Result<Vec<GeoHit>, StoreError> {
        self.ensure_open()?;
        let geo = self.geo.read().await;
        let Some(members) = geo.get(key) else {
            return Ok(Vec::new());
        };

        // BTreeMap iteration plus a stable sort keeps equal distances in member order
        let mut within: Vec<(&String, Coordinates, f64)> = members
            .iter()
            .map(|(member, coords)| (member, *coords, haversine_km(origin, *coords)))
            .filter(|(_, _, distance)| *distance <= radius_km)
            .collect();
        within.sort_by(|a, b| a.2.total_cmp(&b.2));
        within.truncate(count);

        debug!("geo_search {} matched {} of {} members", key, within.len(), members.len());

        Ok(within
            .into_iter()
            .map(|(member, coords, distance)| GeoHit {
                member: member.clone(),
                distance_km: self.echo_distance.then_some(distance),
                coords: self.echo_coords.then_some(coords),
            })
            .collect())
    }
}

#[async_trait]
impl AttributeStore for MemoryStore {
    async fn hset_all(&self, key: &str, fields: RawAttributes) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.hashes.write().await.insert(key.to_string(), fields);
        Ok(())
    }

    async fn hget_all(&self, key: &str) -> Result<Option<RawAttributes>, StoreError> {
        self.ensure_open()?;
        Ok(self.hashes.read().await.get(key).cloned())
    }
}
