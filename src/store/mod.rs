//! Read-only access to the climate database
//!
//! Wraps an sqlx SQLite pool. Every query checks a connection out of the pool
//! and hands it back when the query future completes or is dropped, so a failed
//! or timed-out request never keeps a connection.

mod error;
mod schema;

#[cfg(test)]
pub mod fixture;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

pub use error::{StoreError, StoreResult};
pub use schema::{Measurement, TemperatureSummary};

use schema::{PrecipitationRow, Station, TobsRow};

const STATION_CHECK_SQL: &str =
    "SELECT station, name, latitude, longitude, elevation FROM station LIMIT 1";
const MEASUREMENT_CHECK_SQL: &str = "SELECT station, date, prcp, tobs FROM measurement LIMIT 1";

const PRECIPITATION_SQL: &str = "SELECT date, prcp FROM measurement WHERE date >= ?1";
const STATION_TOBS_SQL: &str =
    "SELECT date, tobs FROM measurement WHERE date >= ?1 AND station = ?2";
const STATION_IDS_SQL: &str = "SELECT DISTINCT station FROM station";
const SUMMARY_FROM_SQL: &str =
    "SELECT MIN(tobs) AS min, MAX(tobs) AS max, AVG(tobs) AS avg FROM measurement WHERE date >= ?1";
const SUMMARY_RANGE_SQL: &str = "SELECT MIN(tobs) AS min, MAX(tobs) AS max, AVG(tobs) AS avg \
     FROM measurement WHERE date >= ?1 AND date <= ?2";
const LATEST_DATE_SQL: &str = "SELECT MAX(date) FROM measurement";
const MOST_ACTIVE_SQL: &str = "SELECT station FROM measurement \
     GROUP BY station ORDER BY COUNT(*) DESC, station ASC LIMIT 1";

/// Format used for the `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Handle to the climate database, cheap to clone
#[derive(Debug, Clone)]
pub struct ClimateStore {
    pool: SqlitePool,
}

impl ClimateStore {
    /// Open the database file read-only and confirm both tables are readable.
    pub async fn open(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|source| StoreError::Open {
                path: config.path.clone(),
                source,
            })?;

        let store = Self::from_pool(pool);
        store.verify_schema().await?;
        Ok(store)
    }

    /// Create from an existing connection pool.
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Decode one row of each table into the declared row types.
    pub async fn verify_schema(&self) -> StoreResult<()> {
        sqlx::query_as::<_, Station>(STATION_CHECK_SQL)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| StoreError::Schema {
                table: "station",
                source,
            })?;
        sqlx::query_as::<_, Measurement>(MEASUREMENT_CHECK_SQL)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| StoreError::Schema {
                table: "measurement",
                source,
            })?;
        Ok(())
    }

    /// `(date, prcp)` of every measurement dated on or after `cutoff`, in table order.
    pub async fn precipitation_since(
        &self,
        cutoff: NaiveDate,
    ) -> StoreResult<Vec<PrecipitationRow>> {
        let rows = sqlx::query_as::<_, PrecipitationRow>(PRECIPITATION_SQL)
            .bind(cutoff.format(DATE_FORMAT).to_string())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// `(date, tobs)` of one station on or after `cutoff`, in table order.
    pub async fn temperatures_for(
        &self,
        station: &str,
        cutoff: NaiveDate,
    ) -> StoreResult<Vec<TobsRow>> {
        let rows = sqlx::query_as::<_, TobsRow>(STATION_TOBS_SQL)
            .bind(cutoff.format(DATE_FORMAT).to_string())
            .bind(station)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Distinct station identifiers from the `station` table.
    pub async fn station_ids(&self) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(STATION_IDS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Temperature aggregates for `start <= date` (and `date <= end` when given).
    ///
    /// The bounds are compared as text exactly as supplied; no date parsing
    /// happens here, so malformed input simply selects whatever sorts into range.
    pub async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> StoreResult<TemperatureSummary> {
        let summary = match end {
            Some(end) => {
                sqlx::query_as::<_, TemperatureSummary>(SUMMARY_RANGE_SQL)
                    .bind(start)
                    .bind(end)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, TemperatureSummary>(SUMMARY_FROM_SQL)
                    .bind(start)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(summary)
    }

    /// Most recent `date` in the measurement table, `None` when it is empty.
    pub async fn latest_date(&self) -> StoreResult<Option<NaiveDate>> {
        let latest = sqlx::query_scalar::<_, Option<String>>(LATEST_DATE_SQL)
            .fetch_one(&self.pool)
            .await?;
        latest
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| StoreError::InvalidDate(raw))
            })
            .transpose()
    }

    /// Station with the most measurement rows; ties go to the smallest id.
    pub async fn most_active_station(&self) -> StoreResult<Option<String>> {
        let station = sqlx::query_scalar::<_, String>(MOST_ACTIVE_SQL)
            .fetch_optional(&self.pool)
            .await?;
        Ok(station)
    }

    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection; used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::fixture::{self, row};
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("absent.sqlite").to_string_lossy().into_owned(),
            max_connections: 1,
        };
        let err = ClimateStore::open(&config).await.unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
    }

    #[tokio::test]
    async fn test_open_file_without_tables_fails_schema_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.sqlite");
        std::fs::File::create(&path).unwrap();
        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 1,
        };
        let err = ClimateStore::open(&config).await.unwrap_err();
        assert!(matches!(err, StoreError::Schema { table: "station", .. }));
    }

    #[tokio::test]
    async fn test_open_seeded_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hawaii.sqlite");
        fixture::seed_file(&path, &[row("USC00519281", "2017-01-01", Some(0.1), 60.0)]).await;

        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 2,
        };
        let store = ClimateStore::open(&config).await.unwrap();
        assert_eq!(store.station_ids().await.unwrap().len(), fixture::STATIONS.len());
        store.close().await;
    }

    #[tokio::test]
    async fn test_precipitation_since_excludes_older_rows() {
        let store = fixture::store(&[
            row("USC00519397", "2016-08-23", Some(0.5), 70.0),
            row("USC00519397", "2016-08-24", Some(0.08), 79.0),
            row("USC00519281", "2017-08-23", None, 76.0),
        ])
        .await;

        let rows = store.precipitation_since(date("2016-08-24")).await.unwrap();
        let dates: Vec<_> = rows.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(dates, vec!["2016-08-24", "2017-08-23"]);
        assert_eq!(rows[1].prcp, None);
    }

    #[tokio::test]
    async fn test_temperatures_for_filters_station() {
        let store = fixture::store(&[
            row("USC00519281", "2016-08-24", Some(2.15), 77.0),
            row("USC00519397", "2016-08-24", Some(0.08), 79.0),
            row("USC00519281", "2016-08-01", Some(0.0), 75.0),
        ])
        .await;

        let rows = store
            .temperatures_for("USC00519281", date("2016-08-24"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tobs, 77.0);
    }

    #[tokio::test]
    async fn test_station_ids_distinct() {
        let store = fixture::store(&[]).await;
        fixture::add_station(&store, "USC00519281").await;
        fixture::add_station(&store, "USC00519397").await;

        let ids = store.station_ids().await.unwrap();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.len(), fixture::STATIONS.len());
    }

    #[tokio::test]
    async fn test_temperature_summary_range() {
        let store = fixture::store(&[
            row("USC00519281", "2017-01-01", None, 60.0),
            row("USC00519281", "2017-06-01", None, 80.0),
            row("USC00519281", "2017-07-01", None, 90.0),
        ])
        .await;

        let summary = store
            .temperature_summary("2017-01-01", Some("2017-06-01"))
            .await
            .unwrap();
        assert_eq!(summary.min, Some(60.0));
        assert_eq!(summary.max, Some(80.0));
        assert_eq!(summary.avg, Some(70.0));

        let open_ended = store.temperature_summary("2017-01-01", None).await.unwrap();
        assert_eq!(open_ended.max, Some(90.0));
    }

    #[tokio::test]
    async fn test_temperature_summary_no_rows_is_null() {
        let store = fixture::store(&[row("USC00519281", "2017-01-01", None, 60.0)]).await;
        let summary = store.temperature_summary("2018-01-01", None).await.unwrap();
        assert_eq!(
            summary,
            TemperatureSummary {
                min: None,
                max: None,
                avg: None
            }
        );
    }

    #[tokio::test]
    async fn test_latest_date_and_most_active() {
        let empty = fixture::store(&[]).await;
        assert_eq!(empty.latest_date().await.unwrap(), None);
        assert_eq!(empty.most_active_station().await.unwrap(), None);

        let store = fixture::store(&[
            row("USC00519397", "2017-08-23", None, 81.0),
            row("USC00519281", "2017-08-18", None, 79.0),
            row("USC00519281", "2017-08-17", None, 76.0),
        ])
        .await;
        assert_eq!(store.latest_date().await.unwrap(), Some(date("2017-08-23")));
        assert_eq!(
            store.most_active_station().await.unwrap().as_deref(),
            Some("USC00519281")
        );
    }

    #[tokio::test]
    async fn test_latest_date_rejects_unparsable_dates() {
        let store = fixture::store(&[row("USC00519281", "August 2017", None, 70.0)]).await;
        let err = store.latest_date().await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDate(raw) if raw == "August 2017"));
    }

    #[tokio::test]
    async fn test_closed_store_reports_query_error() {
        let store = fixture::store(&[]).await;
        store.ping().await.unwrap();
        store.close().await;
        assert!(matches!(store.ping().await, Err(StoreError::Query(_))));
    }
}
