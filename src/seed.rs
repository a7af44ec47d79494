//! Ingestion of charger records into the backing store.
//!
//! This is the only code that writes to the store. The search path never
//! calls it.

use crate::config::StoreConfig;
use crate::models::Coordinates;
use crate::search::assemble::{
    FIELD_ADDRESS, FIELD_AMENITIES, FIELD_CONNECTORS, FIELD_LAT, FIELD_LNG, FIELD_NAME,
    FIELD_NETWORK, FIELD_POWER, FIELD_PRICE, FIELD_STATUS, FIELD_UPDATED_AT,
};
use crate::store::{AttributeStore, GeoIndex, RawAttributes};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One charger as written by the seeding process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCharger {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub connectors: Vec<String>,
}

impl SeedCharger {
    /// Attribute record for this charger, stamped with `updated_at` (epoch ms)
    pub fn to_fields(&self, updated_at: i64) -> Result<RawAttributes> {
        let mut fields = RawAttributes::from([
            (FIELD_NAME.to_string(), self.name.clone()),
            (FIELD_ADDRESS.to_string(), self.address.clone()),
            (FIELD_LAT.to_string(), self.lat.to_string()),
            (FIELD_LNG.to_string(), self.lng.to_string()),
            (FIELD_POWER.to_string(), self.power_kw.to_string()),
            (FIELD_PRICE.to_string(), self.price_per_kwh.to_string()),
            (FIELD_AMENITIES.to_string(), serde_json::to_string(&self.amenities)?),
            (FIELD_UPDATED_AT.to_string(), updated_at.to_string()),
        ]);
        if let Some(status) = &self.status {
            fields.insert(FIELD_STATUS.to_string(), status.clone());
        }
        if let Some(network) = &self.network {
            fields.insert(FIELD_NETWORK.to_string(), network.clone());
        }
        if !self.connectors.is_empty() {
            fields.insert(FIELD_CONNECTORS.to_string(), serde_json::to_string(&self.connectors)?);
        }
        Ok(fields)
    }
}

/// Write `chargers` into `store`: attribute record first, then the geo entry.
/// Chargers with invalid coordinates are skipped. Returns how many were written.
pub async fn seed<S>(store: &S, config: &StoreConfig, chargers: &[SeedCharger]) -> Result<usize>
where
    S: GeoIndex + AttributeStore + ?Sized,
{
    let mut written = 0;
    for charger in chargers {
        if !(Coordinates { lat: charger.lat, lng: charger.lng }).is_valid() {
            warn!(
                "Skipping {}: invalid coordinates ({}, {})",
                charger.id, charger.lat, charger.lng
            );
            continue;
        }

        let fields = charger.to_fields(Utc::now().timestamp_millis())?;
        let key = format!("{}{}", config.key_prefix, charger.id);
        store
            .hset_all(&key, fields)
            .await
            .with_context(|| format!("Failed to write attributes for {}", charger.id))?;
        store
            .geo_add(&config.geo_key, &charger.id, charger.lng, charger.lat)
            .await
            .with_context(|| format!("Failed to index {}", charger.id))?;
        written += 1;
    }

    info!("Seeded {} chargers into {}", written, config.geo_key);
    Ok(written)
}

/// Read a JSON array of chargers
pub async fn load_seed_file(path: &Path) -> Result<Vec<SeedCharger>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid seed file {}", path.display()))
}

/// Bundled demo dataset: ten chargers around Singapore
pub fn builtin_chargers() -> Vec<SeedCharger> {
    let charger = |id: &str,
                   name: &str,
                   address: &str,
                   (lat, lng): (f64, f64),
                   power_kw: f64,
                   price_per_kwh: f64,
                   amenities: &[&str]| SeedCharger {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        lat,
        lng,
        power_kw,
        price_per_kwh,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        status: None,
        network: None,
        connectors: Vec::new(),
    };

    vec![
        charger(
            "sg-01",
            "Orchard Central EV Hub",
            "181 Orchard Rd, Singapore 238896",
            (1.3006, 103.8397),
            60.0,
            0.55,
            &["mall", "food", "restroom"],
        ),
        charger(
            "sg-02",
            "VivoCity Fast Charge",
            "1 HarbourFront Walk, Singapore 098585",
            (1.2644, 103.8223),
            150.0,
            0.62,
            &["mall", "food"],
        ),
        charger(
            "sg-03",
            "Changi Airport T3 Supercharger",
            "65 Airport Blvd, Singapore 819663",
            (1.3603, 103.9894),
            250.0,
            0.72,
            &["airport", "food", "restroom", "wifi"],
        ),
        charger(
            "sg-04",
            "Bishan Community Club",
            "51 Bishan St 13, Singapore 579799",
            (1.3508, 103.8485),
            22.0,
            0.38,
            &["parking"],
        ),
        charger(
            "sg-05",
            "Jurong East JEM",
            "50 Jurong Gateway Rd, Singapore 608549",
            (1.3334, 103.7436),
            120.0,
            0.58,
            &["mall", "food"],
        ),
        charger(
            "sg-06",
            "Marina Bay Sands Carpark",
            "10 Bayfront Ave, Singapore 018956",
            (1.2834, 103.8607),
            43.0,
            0.65,
            &["parking", "restroom"],
        ),
        charger(
            "sg-07",
            "Tampines Mall",
            "4 Tampines Central 5, Singapore 529510",
            (1.3526, 103.9447),
            50.0,
            0.48,
            &["mall"],
        ),
        charger(
            "sg-08",
            "Woodlands Civic Centre",
            "900 South Woodlands Dr, Singapore 730900",
            (1.4360, 103.7865),
            60.0,
            0.45,
            &["parking", "food"],
        ),
        charger(
            "sg-09",
            "Punggol Waterway Point",
            "83 Punggol Central, Singapore 828761",
            (1.4052, 103.9024),
            90.0,
            0.52,
            &["mall", "food", "wifi"],
        ),
        charger(
            "sg-10",
            "Bukit Timah Plaza",
            "1 Jalan Anak Bukit, Singapore 588996",
            (1.3394, 103.7785),
            22.0,
            0.40,
            &["parking"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;
    use std::io::Write;

    #[test]
    fn builtin_powers() {
        let powers: Vec<f64> = builtin_chargers().iter().map(|c| c.power_kw).collect();
        assert_eq!(
            powers,
            vec![60.0, 150.0, 250.0, 22.0, 120.0, 43.0, 50.0, 60.0, 90.0, 22.0]
        );
    }

    #[test]
    fn fields_encode_lists_as_json() {
        let mut charger = builtin_chargers().remove(0);
        charger.connectors = vec!["CCS2".to_string(), "Type 2".to_string()];
        charger.network = Some("SP Group".to_string());

        let fields = charger.to_fields(42).unwrap();
        assert_eq!(fields[FIELD_AMENITIES], r#"["mall","food","restroom"]"#);
        assert_eq!(fields[FIELD_CONNECTORS], r#"["CCS2","Type 2"]"#);
        assert_eq!(fields[FIELD_NETWORK], "SP Group");
        assert_eq!(fields[FIELD_UPDATED_AT], "42");
        assert!(!fields.contains_key(FIELD_STATUS));
    }

    #[tokio::test]
    async fn seed_writes_index_and_attributes() {
        let config = Config::defaults().store;
        let store = MemoryStore::new();
        let written = seed(&store, &config, &builtin_chargers()).await.unwrap();

        assert_eq!(written, 10);
        assert_eq!(store.geo_len(&config.geo_key).await.unwrap(), 10);
        let record = store.hget_all("charger:sg-03").await.unwrap().unwrap();
        assert_eq!(record[FIELD_NAME], "Changi Airport T3 Supercharger");
    }

    #[tokio::test]
    async fn invalid_coordinates_are_skipped() {
        let config = Config::defaults().store;
        let store = MemoryStore::new();
        let mut chargers = builtin_chargers();
        chargers[0].lat = 123.0;

        assert_eq!(seed(&store, &config, &chargers).await.unwrap(), 9);
        assert_eq!(store.hget_all("charger:sg-01").await.unwrap(), None);
    }

    #[tokio::test]
    async fn seed_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"x1","name":"Depot","address":"1 Road","lat":1.3,"lng":103.8,"powerKW":22,"pricePerKWh":0.4,"status":"offline"}}]"#
        )
        .unwrap();

        let chargers = load_seed_file(file.path()).await.unwrap();
        assert_eq!(chargers.len(), 1);
        assert_eq!(chargers[0].status.as_deref(), Some("offline"));
        assert!(chargers[0].amenities.is_empty());
    }
}
