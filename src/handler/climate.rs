//! Climate endpoints
//!
//! Each handler runs one store query and maps the rows to the JSON shape
//! clients of `/api/v1.0` expect. Key names (including the `"Minimum temperaure"`
//! spelling) are part of that contract and must not change.

use chrono::NaiveDate;
use serde::Serialize;
use std::future::Future;

use crate::config::{window_start, AppState, WindowMode};
use crate::store::{StoreError, StoreResult, TemperatureSummary};

/// One `/precipitation` element
#[derive(Debug, Serialize, PartialEq)]
pub struct PrecipitationEntry {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
}

/// Element of the flattened `/tobs` list: dates and readings alternate
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TobsValue {
    Date(String),
    Tobs(f64),
}

/// Body element of `/from/<start>`
#[derive(Debug, Serialize, PartialEq)]
pub struct FromSummary {
    pub from: String,
    #[serde(rename = "Minimum temperaure")]
    pub min: Option<f64>,
    #[serde(rename = "Maximum temperature")]
    pub max: Option<f64>,
    #[serde(rename = "Average temperature")]
    pub avg: Option<f64>,
}

/// Body element of `/range/<start>/<end>`
#[derive(Debug, Serialize, PartialEq)]
pub struct RangeSummary {
    #[serde(rename = "Date range from")]
    pub from: String,
    #[serde(rename = "Date range to")]
    pub to: String,
    #[serde(rename = "Minimum temperaure")]
    pub min: Option<f64>,
    #[serde(rename = "Maximum temperature")]
    pub max: Option<f64>,
    #[serde(rename = "Average temperature")]
    pub avg: Option<f64>,
}

/// The "last year" window and the station `/tobs` reports on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub cutoff: NaiveDate,
    pub station: String,
}

/// Bound a store query by the configured timeout
pub async fn with_timeout<T>(
    state: &AppState,
    query: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    let limit = state.query_timeout();
    tokio::time::timeout(limit, query)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

/// Resolve the window for this request
///
/// `fixed` uses the configured reference date and station. `latest` measures back
/// from the newest stored date and picks the station with the most rows, falling
/// back to the configured values when the table is empty.
pub async fn resolve_window(state: &AppState) -> StoreResult<Window> {
    let dataset = &state.config.dataset;
    let cutoff = resolve_cutoff(state).await?;
    let station = match dataset.window {
        WindowMode::Fixed => None,
        WindowMode::Latest => state.store.most_active_station().await?,
    };
    Ok(Window {
        cutoff,
        station: station.unwrap_or_else(|| dataset.most_active_station.clone()),
    })
}

/// First date of the "last year" window, without looking up a station
pub async fn resolve_cutoff(state: &AppState) -> StoreResult<NaiveDate> {
    let dataset = &state.config.dataset;
    match dataset.window {
        WindowMode::Fixed => Ok(state.cutoff),
        WindowMode::Latest => Ok(match state.store.latest_date().await? {
            Some(latest) => window_start(latest, dataset.window_days).unwrap_or(NaiveDate::MIN),
            None => state.cutoff,
        }),
    }
}

pub async fn precipitation(state: &AppState) -> StoreResult<Vec<PrecipitationEntry>> {
    let cutoff = resolve_cutoff(state).await?;
    let rows = state.store.precipitation_since(cutoff).await?;
    Ok(rows
        .into_iter()
        .map(|m| PrecipitationEntry {
            date: m.date,
            precipitation: m.prcp,
        })
        .collect())
}

pub async fn stations(state: &AppState) -> StoreResult<Vec<String>> {
    state.store.station_ids().await
}

pub async fn tobs(state: &AppState) -> StoreResult<Vec<TobsValue>> {
    let window = resolve_window(state).await?;
    let rows = state
        .store
        .temperatures_for(&window.station, window.cutoff)
        .await?;
    Ok(rows
        .into_iter()
        .flat_map(|m| [TobsValue::Date(m.date), TobsValue::Tobs(m.tobs)])
        .collect())
}

/// Aggregates from `start` to the end of the data; the average is rounded to one decimal
pub async fn summary_from(state: &AppState, start: &str) -> StoreResult<Vec<FromSummary>> {
    let TemperatureSummary { min, max, avg } = state.store.temperature_summary(start, None).await?;
    Ok(vec![FromSummary {
        from: start.to_string(),
        min,
        max,
        avg: avg.map(round_one_decimal),
    }])
}

/// Aggregates over `[start, end]`; the average is returned unrounded
pub async fn summary_range(
    state: &AppState,
    start: &str,
    end: &str,
) -> StoreResult<Vec<RangeSummary>> {
    let TemperatureSummary { min, max, avg } =
        state.store.temperature_summary(start, Some(end)).await?;
    Ok(vec![RangeSummary {
        from: start.to_string(),
        to: end.to_string(),
        min,
        max,
        avg,
    }])
}

/// Round to one decimal, exact halves going to the even digit (70.25 -> 70.2)
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
