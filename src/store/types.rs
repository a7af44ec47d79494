use crate::models::Coordinates;
use std::collections::HashMap;

/// Field/value map stored under one attribute key
pub type RawAttributes = HashMap<String, String>;

/// One member returned by a radius query
#[derive(Debug, Clone, PartialEq)]
pub struct GeoHit {
    pub member: String,
    /// Distance from the query origin, when the store reports it
    pub distance_km: Option<f64>,
    /// Coordinates echoed back by the store, when requested and supported
    pub coords: Option<Coordinates>,
}
