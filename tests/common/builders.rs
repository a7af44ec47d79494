//! Test builders: ergonomic constructors for seed records and queries.
//!
//! These favour readability in assertions; they panic on invalid input.

use charger_scout::seed::SeedCharger;
use charger_scout::{Coordinates, Query};

/// Fluent builder for [`SeedCharger`] fixtures.
///
/// ```rust,ignore
/// let charger = ChargerBuilder::new("c1", 1.30, 103.84).power(150.0).build();
/// ```
pub struct ChargerBuilder {
    charger: SeedCharger,
}

impl ChargerBuilder {
    pub fn new(id: &str, lat: f64, lng: f64) -> Self {
        Self {
            charger: SeedCharger {
                id: id.to_string(),
                name: format!("Charger {id}"),
                address: format!("{id} Test Street"),
                lat,
                lng,
                power_kw: 50.0,
                price_per_kwh: 0.5,
                amenities: Vec::new(),
                status: None,
                network: None,
                connectors: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.charger.name = name.to_string();
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.charger.address = address.to_string();
        self
    }

    pub fn power(mut self, power_kw: f64) -> Self {
        self.charger.power_kw = power_kw;
        self
    }

    pub fn price(mut self, price_per_kwh: f64) -> Self {
        self.charger.price_per_kwh = price_per_kwh;
        self
    }

    pub fn amenity(mut self, amenity: &str) -> Self {
        self.charger.amenities.push(amenity.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.charger.status = Some(status.to_string());
        self
    }

    pub fn build(self) -> SeedCharger {
        self.charger
    }
}

/// Query around the Singapore reference origin
pub fn query_sg() -> Query {
    Query::around(sg_origin())
}

pub fn sg_origin() -> Coordinates {
    Coordinates::new(1.3521, 103.8198).unwrap()
}
