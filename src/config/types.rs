// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Reference date the "last year" window is measured back from
pub const REFERENCE_DATE: &str = "2017-08-23";
/// Length of the "last year" window in days
pub const WINDOW_DAYS: u64 = 364;
/// Station with the most observations in the supplied dataset
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub dataset: DatasetConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    /// Upper bound for a single store query, in seconds
    pub query_timeout: u64,
    /// How long shutdown waits for open connections before closing the pool, in seconds
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Path of the sqlite file holding the `measurement` and `station` tables
    pub path: String,
    /// Pool size
    pub max_connections: u32,
}

/// How the "last year" window and the tobs station are chosen
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Use `reference_date` and `most_active_station` as configured
    #[default]
    Fixed,
    /// Derive both from the data on every request
    Latest,
}

/// Dataset constants used by the window endpoints
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub reference_date: String,
    pub window_days: u64,
    pub most_active_station: String,
    #[serde(default)]
    pub window: WindowMode,
}
