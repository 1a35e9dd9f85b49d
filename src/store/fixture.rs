//! Test fixture: a small copy of the hawaii schema seeded with chosen rows

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use super::{ClimateStore, Measurement};

/// (station, name, latitude, longitude, elevation)
pub const STATIONS: [(&str, &str, f64, f64, f64); 3] = [
    ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
    ("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
    ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
];

const SCHEMA: [&str; 2] = [
    "CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT, name TEXT, \
     latitude FLOAT, longitude FLOAT, elevation FLOAT)",
    "CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, \
     prcp FLOAT, tobs FLOAT)",
];

pub fn row(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

async fn seed(pool: &SqlitePool, rows: &[Measurement]) {
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await.expect("create table");
    }
    for (station, name, latitude, longitude, elevation) in STATIONS {
        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(station)
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .bind(elevation)
        .execute(pool)
        .await
        .expect("insert station");
    }
    for m in rows {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)")
            .bind(&m.station)
            .bind(&m.date)
            .bind(m.prcp)
            .bind(m.tobs)
            .execute(pool)
            .await
            .expect("insert measurement");
    }
}

/// Insert another `station` row reusing an existing identifier
pub async fn add_station(store: &ClimateStore, station: &str) {
    sqlx::query("INSERT INTO station (station, name) VALUES (?1, 'duplicate')")
        .bind(station)
        .execute(&store.pool)
        .await
        .expect("insert duplicate station");
}

/// In-memory store; a single pooled connection keeps the database alive
pub async fn store(rows: &[Measurement]) -> ClimateStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    seed(&pool, rows).await;
    ClimateStore::from_pool(pool)
}

/// Write a seeded database file at `path`
pub async fn seed_file(path: &Path, rows: &[Measurement]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("create sqlite file");
    seed(&pool, rows).await;
    pool.close().await;
}
