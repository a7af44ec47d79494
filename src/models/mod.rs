use crate::error::SearchError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values outside the valid ranges
    pub fn new(lat: f64, lng: f64) -> Result<Self, SearchError> {
        let coords = Self { lat, lng };
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(SearchError::InvalidQuery(format!(
                "coordinates out of range: lat={lat}, lng={lng}"
            )))
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Operational status of a charger
///
/// The three known values parse case-insensitively; anything else is kept
/// verbatim so that operator-specific states survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargerStatus {
    Available,
    Busy,
    Offline,
    Other(String),
}

impl ChargerStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" => ChargerStatus::Available,
            "busy" => ChargerStatus::Busy,
            "offline" => ChargerStatus::Offline,
            _ => ChargerStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChargerStatus::Available => "available",
            ChargerStatus::Busy => "busy",
            ChargerStatus::Offline => "offline",
            ChargerStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for ChargerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChargerStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Typed attribute record for one charger, as read from the attribute store
///
/// Numeric fields are NaN when missing or malformed, everything else is
/// `None` or empty. A record built from nothing is still a valid record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerAttributes {
    pub name: Option<String>,
    pub address: Option<String>,
    pub coords: Option<Coordinates>,
    pub power_kw: f64,
    pub price_per_kwh: f64,
    pub status: Option<ChargerStatus>,
    pub amenities: Vec<String>,
    /// Milliseconds since the Unix epoch
    pub updated_at: Option<i64>,
    pub network: Option<String>,
    pub connectors: Vec<String>,
}

impl Default for ChargerAttributes {
    fn default() -> Self {
        Self {
            name: None,
            address: None,
            coords: None,
            power_kw: f64::NAN,
            price_per_kwh: f64::NAN,
            status: None,
            amenities: Vec::new(),
            updated_at: None,
            network: None,
            connectors: Vec::new(),
        }
    }
}

/// Ordering applied to a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending distance, the order the geo index already returns
    #[default]
    Distance,
    /// Descending power rating
    Power,
    /// Ascending price
    Price,
    /// Most recently updated first
    Updated,
}

impl SortKey {
    /// Lenient parse; anything unrecognised falls back to [`SortKey::Distance`]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "power" => SortKey::Power,
            "price" => SortKey::Price,
            "updated" => SortKey::Updated,
            _ => SortKey::Distance,
        }
    }
}

/// Proximity search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub origin: Coordinates,
    pub radius_km: f64,
    pub limit: usize,
    /// Minimum power in kW; `None` disables the predicate
    pub min_power: Option<f64>,
    /// Maximum price per kWh; `None` disables the predicate
    pub max_price: Option<f64>,
    /// Case-insensitive substring matched against name or address
    pub text: String,
    pub sort: SortKey,
}

impl Query {
    pub const DEFAULT_RADIUS_KM: f64 = 10.0;
    pub const DEFAULT_LIMIT: usize = 50;

    /// Query around `origin` with default radius and limit and no filters
    pub fn around(origin: Coordinates) -> Self {
        Self {
            origin,
            radius_km: Self::DEFAULT_RADIUS_KM,
            limit: Self::DEFAULT_LIMIT,
            min_power: None,
            max_price: None,
            text: String::new(),
            sort: SortKey::Distance,
        }
    }

    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn min_power(mut self, min_power: f64) -> Self {
        self.min_power = Some(min_power);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.origin.is_valid() {
            return Err(SearchError::InvalidQuery(format!(
                "origin out of range: lat={}, lng={}",
                self.origin.lat, self.origin.lng
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(SearchError::InvalidQuery(format!(
                "radius must be a positive number of km, got {}",
                self.radius_km
            )));
        }
        if self.limit == 0 {
            return Err(SearchError::InvalidQuery("limit must be at least 1".to_string()));
        }
        for (name, value) in [("minPower", self.min_power), ("maxPrice", self.max_price)] {
            if value.is_some_and(f64::is_nan) {
                return Err(SearchError::InvalidQuery(format!("{name} must be a number")));
            }
        }
        Ok(())
    }
}

/// One charger as returned to a caller: index hit merged with its attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
    pub status: Option<ChargerStatus>,
    pub amenities: Vec<String>,
    pub updated_at: Option<i64>,
    pub coords: Option<Coordinates>,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connectors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(1.3521, 103.8198).is_ok());
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn sort_key_unknown_defaults_to_distance() {
        assert_eq!(SortKey::parse("POWER"), SortKey::Power);
        assert_eq!(SortKey::parse(" price "), SortKey::Price);
        assert_eq!(SortKey::parse("updated"), SortKey::Updated);
        assert_eq!(SortKey::parse("rating"), SortKey::Distance);
        assert_eq!(SortKey::parse(""), SortKey::Distance);
    }

    #[test]
    fn status_keeps_unknown_values() {
        assert_eq!(ChargerStatus::parse("Available"), ChargerStatus::Available);
        assert_eq!(
            ChargerStatus::parse("maintenance"),
            ChargerStatus::Other("maintenance".to_string())
        );
        assert_eq!(ChargerStatus::parse("maintenance").to_string(), "maintenance");
    }

    #[test]
    fn query_validation() {
        let origin = Coordinates::new(1.3521, 103.8198).unwrap();
        assert!(Query::around(origin).validate().is_ok());
        assert!(Query::around(origin).radius_km(0.0).validate().is_err());
        assert!(Query::around(origin).radius_km(f64::INFINITY).validate().is_err());
        assert!(Query::around(origin).limit(0).validate().is_err());
        assert!(Query::around(origin).min_power(f64::NAN).validate().is_err());
    }

    #[test]
    fn result_record_wire_shape() {
        let record = ResultRecord {
            id: "c1".to_string(),
            name: Some("Orchard Central".to_string()),
            address: None,
            power_kw: 60.0,
            price_per_kwh: f64::NAN,
            status: Some(ChargerStatus::Available),
            amenities: vec!["mall".to_string()],
            updated_at: Some(1_700_000_000_000),
            coords: Some(Coordinates { lat: 1.3, lng: 103.8 }),
            distance_km: 2.5,
            network: None,
            connectors: Vec::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "c1",
                "name": "Orchard Central",
                "address": null,
                "powerKW": 60.0,
                "pricePerKWh": null,
                "status": "available",
                "amenities": ["mall"],
                "updatedAt": 1_700_000_000_000i64,
                "coords": { "lat": 1.3, "lng": 103.8 },
                "distanceKm": 2.5
            })
        );
    }
}
