//! Ready-made stores and services.

use charger_scout::config::{Config, StoreConfig};
use charger_scout::seed::{builtin_chargers, seed, SeedCharger};
use charger_scout::store::MemoryStore;
use charger_scout::ChargerSearch;
use std::sync::Arc;

pub fn store_config() -> StoreConfig {
    Config::defaults().store
}

/// A store holding `chargers` and a search service over it
pub async fn seeded(chargers: &[SeedCharger]) -> (Arc<MemoryStore>, ChargerSearch) {
    let config = store_config();
    let store = Arc::new(MemoryStore::new());
    seed(store.as_ref(), &config, chargers).await.unwrap();
    let service = ChargerSearch::with_store(store.clone(), &config.geo_key, &config.key_prefix);
    (store, service)
}

/// The bundled Singapore dataset
pub async fn seeded_builtin() -> (Arc<MemoryStore>, ChargerSearch) {
    seeded(&builtin_chargers()).await
}
