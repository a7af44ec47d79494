//! HTTP surface.
//!
//! - `GET /api/chargers` runs one search from query-string parameters
//! - `GET /healthz` answers `ok`

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::models::{Coordinates, Query, ResultRecord, SortKey};
use crate::search::ChargerSearch;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query as QueryParams, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// State shared by every handler
pub struct AppState {
    pub search: ChargerSearch,
    pub limits: SearchConfig,
}

/// Raw request parameters; anything absent falls back to configuration
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub radius: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_power: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

/// A blank form field (`minPower=`) means the parameter is not set
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl SearchParams {
    /// Turn request parameters into a validated query, clamping the limit
    pub fn into_query(self, limits: &SearchConfig) -> Result<Query, SearchError> {
        let origin = Coordinates::new(self.lat, self.lng)?;
        let mut query = Query::around(origin)
            .radius_km(self.radius.unwrap_or(limits.default_radius_km))
            .limit(self.limit.unwrap_or(limits.default_limit).min(limits.max_limit))
            .text(self.q.unwrap_or_default())
            .sort(self.sort.as_deref().map(SortKey::parse).unwrap_or_default());
        query.min_power = self.min_power;
        query.max_price = self.max_price;
        query.validate()?;
        Ok(query)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chargers", get(search_chargers))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

async fn search_chargers(
    State(state): State<Arc<AppState>>,
    params: Result<QueryParams<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<ResultRecord>>, ApiError> {
    let QueryParams(params) =
        params.map_err(|rejection| SearchError::InvalidQuery(rejection.body_text()))?;
    let query = params.into_query(&state.limits)?;
    let results = state
        .search
        .search_with_timeout(&query, state.limits.request_timeout())
        .await?;
    Ok(Json(results))
}

/// Search failure mapped to an HTTP status
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SearchError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            SearchError::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SearchError::Timeout(_) | SearchError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        };
        if status.is_server_error() {
            warn!("Search request failed: {}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
