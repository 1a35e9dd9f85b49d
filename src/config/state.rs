// Application state module
// Shared by every connection task for the lifetime of the process

use chrono::NaiveDate;
use std::time::Duration;

use super::types::Config;
use crate::store::ClimateStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: ClimateStore,
    /// Start of the fixed "last year" window, resolved once at startup
    pub cutoff: NaiveDate,
}

impl AppState {
    /// Create `AppState`, failing if the dataset window cannot be resolved
    pub fn new(config: Config, store: ClimateStore) -> Result<Self, String> {
        let cutoff = config.dataset.cutoff()?;
        Ok(Self {
            config,
            store,
            cutoff,
        })
    }

    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.config.performance.query_timeout)
    }
}
