use crate::store::{AttributeStore, RawAttributes};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-charger attribute lookups under a namespaced key
#[derive(Clone)]
pub struct AttributeAdapter {
    store: Arc<dyn AttributeStore>,
    prefix: String,
}

impl AttributeAdapter {
    pub fn new(store: Arc<dyn AttributeStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Store key holding the attributes of `id`
    pub fn key_for(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Fetch the attribute records of `ids`, one lookup per ID, all in flight
    /// at once
    ///
    /// Every requested ID is present in the returned map. Records that are
    /// missing or whose lookup failed map to `None`.
    pub async fn fetch_attributes(&self, ids: &[String]) -> HashMap<String, Option<RawAttributes>> {
        let lookups = ids.iter().map(|id| async move {
            let key = self.key_for(id);
            let record = self.store.hget_all(&key).await;
            (id.clone(), record)
        });

        let mut found = 0usize;
        let mut failed = 0usize;
        let mut attributes = HashMap::with_capacity(ids.len());
        for (id, record) in join_all(lookups).await {
            let record = match record {
                Ok(Some(fields)) => {
                    found += 1;
                    Some(fields)
                }
                Ok(None) => None,
                Err(e) => {
                    failed += 1;
                    warn!("Attribute lookup for {} failed, keeping it unpopulated: {}", id, e);
                    None
                }
            };
            attributes.insert(id, record);
        }

        if found < ids.len() {
            warn!(
                "Partial attribute fetch: {} of {} records found ({} lookups failed)",
                found,
                ids.len(),
                failed
            );
        } else {
            debug!("Fetched {} attribute records", found);
        }
        attributes
    }
}
