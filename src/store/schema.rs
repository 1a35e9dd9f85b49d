//! Row types for the two externally owned tables
//!
//! Columns are declared here instead of being discovered at runtime; opening the
//! store decodes one row of each table into these types to confirm they match.

use sqlx::FromRow;

/// One climate reading for a station on a date (`measurement` table)
#[allow(dead_code)] // endpoints read narrower projections; the full row backs the schema check
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Measurement {
    pub station: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: f64,
}

/// `(date, prcp)` projection served by `/precipitation`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PrecipitationRow {
    pub date: String,
    pub prcp: Option<f64>,
}

/// `(date, tobs)` projection served by `/tobs`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TobsRow {
    pub date: String,
    pub tobs: f64,
}

/// A weather observation site (`station` table)
#[allow(dead_code)] // only the identifier is served; the rest is decoded for the schema check
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Station {
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// MIN/MAX/AVG of `tobs` over a date range; all NULL when no rows match
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct TemperatureSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

