use crate::models::{Query, ResultRecord, SortKey};
use std::cmp::Ordering;

/// Slack on the price ceiling so a price equal to it survives rounding
pub const PRICE_EPSILON: f64 = 1e-9;

/// Whether `record` passes every predicate of `query`
pub fn matches(record: &ResultRecord, query: &Query) -> bool {
    matches_text(record, &query.text)
        && query.min_power.map_or(true, |min| record.power_kw >= min)
        && query
            .max_price
            .map_or(true, |max| record.price_per_kwh <= max + PRICE_EPSILON)
}

fn matches_text(record: &ResultRecord, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&record.name, &record.address]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// NaN sorts after every number regardless of direction
fn cmp_number(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if descending => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn cmp_newest_first(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter `records` and order them by `query.sort`
///
/// Input is expected in ascending distance order. The sort is stable, so
/// records with equal keys keep that order.
pub fn apply(records: Vec<ResultRecord>, query: &Query) -> Vec<ResultRecord> {
    let mut kept: Vec<ResultRecord> = records
        .into_iter()
        .filter(|record| matches(record, query))
        .collect();

    match query.sort {
        SortKey::Distance => {}
        SortKey::Power => kept.sort_by(|a, b| cmp_number(a.power_kw, b.power_kw, true)),
        SortKey::Price => kept.sort_by(|a, b| cmp_number(a.price_per_kwh, b.price_per_kwh, false)),
        SortKey::Updated => kept.sort_by(|a, b| cmp_newest_first(a.updated_at, b.updated_at)),
    }
    kept
}
