// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use chrono::{Days, NaiveDate};
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, DatabaseConfig, WindowMode};

use types::{DatasetConfig, MOST_ACTIVE_STATION, REFERENCE_DATE, WINDOW_DAYS};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Environment variables look like `CLIMATE_SERVER__PORT`
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CLIMATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.query_timeout", 10)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "climate-server")?
            .set_default("http.enable_cors", false)?
            .set_default("database.path", "Resources/hawaii.sqlite")?
            .set_default("database.max_connections", 4)?
            .set_default("dataset.reference_date", REFERENCE_DATE)?
            .set_default("dataset.window_days", WINDOW_DAYS)?
            .set_default("dataset.most_active_station", MOST_ACTIVE_STATION)?
            .set_default("dataset.window", "fixed")?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.dataset
            .cutoff()
            .map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl DatasetConfig {
    /// First date inside the fixed "last year" window
    pub fn cutoff(&self) -> Result<NaiveDate, String> {
        let reference = NaiveDate::parse_from_str(&self.reference_date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid dataset.reference_date '{}': {e}", self.reference_date))?;
        window_start(reference, self.window_days)
    }
}

/// Subtract the window length from the last day of the window
pub fn window_start(last_day: NaiveDate, window_days: u64) -> Result<NaiveDate, String> {
    last_day
        .checked_sub_days(Days::new(window_days))
        .ok_or_else(|| format!("Window of {window_days} days before {last_day} is out of range"))
}
