//! Merge index hits with their attribute records.
//!
//! Stored attributes are loosely typed strings. Each field has its own parse
//! function returning `Result<Option<T>, MalformedAttribute>`: `Ok(None)` for
//! an absent field, `Err` for one that is present but unusable. Failures are
//! logged and replaced with the field's default so a single bad record never
//! fails a search.

use crate::error::MalformedAttribute;
use crate::geo::haversine_km;
use crate::models::{ChargerAttributes, ChargerStatus, Coordinates, ResultRecord};
use crate::store::{GeoHit, RawAttributes};
use std::collections::HashMap;
use tracing::warn;

pub const FIELD_NAME: &str = "name";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_LAT: &str = "lat";
pub const FIELD_LNG: &str = "lng";
pub const FIELD_POWER: &str = "powerKW";
pub const FIELD_PRICE: &str = "pricePerKWh";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_AMENITIES: &str = "amenities";
pub const FIELD_UPDATED_AT: &str = "updatedAt";
pub const FIELD_NETWORK: &str = "network";
pub const FIELD_CONNECTORS: &str = "connectors";

fn field<'a>(raw: &'a RawAttributes, name: &str) -> Option<&'a str> {
    raw.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub fn parse_text(raw: &RawAttributes, name: &'static str) -> Option<String> {
    field(raw, name).map(str::to_string)
}

pub fn parse_number(raw: &RawAttributes, name: &'static str) -> Result<Option<f64>, MalformedAttribute> {
    let Some(value) = field(raw, name) else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        Ok(_) => Err(MalformedAttribute::new(name, value, "not a finite number")),
        Err(e) => Err(MalformedAttribute::new(name, value, e)),
    }
}

/// Epoch milliseconds; fractional values are truncated
pub fn parse_timestamp(raw: &RawAttributes, name: &'static str) -> Result<Option<i64>, MalformedAttribute> {
    let Some(value) = field(raw, name) else {
        return Ok(None);
    };
    if let Ok(ms) = value.parse::<i64>() {
        return Ok(Some(ms));
    }
    match parse_number(raw, name)? {
        Some(ms) if ms.abs() < i64::MAX as f64 => Ok(Some(ms as i64)),
        _ => Err(MalformedAttribute::new(name, value, "not an epoch timestamp")),
    }
}

/// A JSON array of strings
pub fn parse_list(raw: &RawAttributes, name: &'static str) -> Result<Option<Vec<String>>, MalformedAttribute> {
    let Some(value) = field(raw, name) else {
        return Ok(None);
    };
    serde_json::from_str::<Vec<String>>(value)
        .map(Some)
        .map_err(|e| MalformedAttribute::new(name, value, e))
}

pub fn parse_coords(raw: &RawAttributes) -> Result<Option<Coordinates>, MalformedAttribute> {
    let lat = parse_number(raw, FIELD_LAT)?;
    let lng = parse_number(raw, FIELD_LNG)?;
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let coords = Coordinates { lat, lng };
            if coords.is_valid() {
                Ok(Some(coords))
            } else {
                Err(MalformedAttribute::new(
                    FIELD_LAT,
                    &format!("{lat},{lng}"),
                    "coordinates out of range",
                ))
            }
        }
        _ => Ok(None),
    }
}

fn recover<T>(
    result: Result<Option<T>, MalformedAttribute>,
    problems: &mut Vec<MalformedAttribute>,
) -> Option<T> {
    result.unwrap_or_else(|problem| {
        problems.push(problem);
        None
    })
}

/// Build a typed record, collecting every field that failed to parse
pub fn parse_attributes(raw: &RawAttributes) -> (ChargerAttributes, Vec<MalformedAttribute>) {
    let mut problems = Vec::new();
    let coords = recover(parse_coords(raw), &mut problems);
    let power_kw = recover(parse_number(raw, FIELD_POWER), &mut problems);
    let price_per_kwh = recover(parse_number(raw, FIELD_PRICE), &mut problems);
    let updated_at = recover(parse_timestamp(raw, FIELD_UPDATED_AT), &mut problems);
    let amenities = recover(parse_list(raw, FIELD_AMENITIES), &mut problems);
    let connectors = recover(parse_list(raw, FIELD_CONNECTORS), &mut problems);

    let attributes = ChargerAttributes {
        name: parse_text(raw, FIELD_NAME),
        address: parse_text(raw, FIELD_ADDRESS),
        coords,
        power_kw: power_kw.unwrap_or(f64::NAN),
        price_per_kwh: price_per_kwh.unwrap_or(f64::NAN),
        status: field(raw, FIELD_STATUS).map(ChargerStatus::parse),
        amenities: amenities.unwrap_or_default(),
        updated_at,
        network: parse_text(raw, FIELD_NETWORK),
        connectors: connectors.unwrap_or_default(),
    };
    (attributes, problems)
}

/// Merge `hits` with their attribute records, one result per hit, in hit order
///
/// Display coordinates come from the attribute record when it has valid ones,
/// otherwise from the index echo.
pub fn merge(
    origin: Coordinates,
    hits: Vec<GeoHit>,
    mut attributes: HashMap<String, Option<RawAttributes>>,
) -> Vec<ResultRecord> {
    hits.into_iter()
        .map(|hit| {
            let attrs = match attributes.remove(&hit.member).flatten() {
                Some(raw) => {
                    let (attrs, problems) = parse_attributes(&raw);
                    for problem in &problems {
                        warn!("Charger {}: {}; using default", hit.member, problem);
                    }
                    attrs
                }
                None => ChargerAttributes::default(),
            };

            let distance_km = hit
                .distance_km
                .or_else(|| hit.coords.or(attrs.coords).map(|c| haversine_km(origin, c)))
                .unwrap_or(f64::NAN);

            ResultRecord {
                id: hit.member,
                name: attrs.name,
                address: attrs.address,
                power_kw: attrs.power_kw,
                price_per_kwh: attrs.price_per_kwh,
                status: attrs.status,
                amenities: attrs.amenities,
                updated_at: attrs.updated_at,
                coords: attrs.coords.or(hit.coords),
                distance_km,
                network: attrs.network,
                connectors: attrs.connectors,
            }
        })
        .collect()
}
